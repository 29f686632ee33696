//! Screen loading state.

use serde::Serialize;

/// What a data-backed screen is currently showing.
///
/// Exactly one variant is active per controller. Views render from this
/// alone; no transport error ever reaches them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LoadingState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Rows are available.
    Loaded,
    /// The fetch (or filter) produced nothing; carries the screen's message.
    Empty(String),
    /// The network is unreachable; the controller keeps retrying.
    NoConnectivity,
    /// A non-retryable failure with a user-facing message.
    Error(String),
}

impl LoadingState {
    /// Whether a dataset is on screen, so client-side filters may republish.
    pub fn shows_dataset(&self) -> bool {
        matches!(self, LoadingState::Loaded | LoadingState::Empty(_))
    }

    /// Whether the controller is still working towards a result.
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadingState::Loading | LoadingState::NoConnectivity)
    }
}
