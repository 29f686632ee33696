//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::controller::Snapshot;
use crate::domain::{DepartureInterval, FilterCriteria, RouteEnd, RouteSelection, TransferVisibility};
use crate::rasp::SegmentQuery;
use crate::stories::{CursorMove, StoryPage, StoryPreview};

/// Text query for a picker.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,

    /// Filter now instead of waiting for typing to settle.
    #[serde(default)]
    pub immediate: bool,
}

/// A picker's list with the query it is filtered by.
#[derive(Debug, Serialize)]
pub struct PickerResponse<R> {
    pub query: String,

    #[serde(flatten)]
    pub snapshot: Snapshot<R>,
}

/// Route and day of a search, as query parameters.
#[derive(Debug, Deserialize)]
pub struct RouteParams {
    /// Origin code
    pub from: String,

    /// Destination code
    pub to: String,

    /// Origin title, for display only
    pub from_title: Option<String>,

    /// Destination title, for display only
    pub to_title: Option<String>,

    /// Travel date as yyyy-MM-dd (defaults to today, UTC)
    pub date: Option<String>,
}

impl RouteParams {
    /// The requested date, if one was given.
    pub fn date(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
    }

    pub fn selection(&self) -> RouteSelection {
        RouteSelection::new(
            RouteEnd::new(self.from_title.clone().unwrap_or_default(), self.from.trim()),
            RouteEnd::new(self.to_title.clone().unwrap_or_default(), self.to.trim()),
        )
    }
}

/// The search a result list belongs to.
#[derive(Debug, Serialize)]
pub struct SearchInfo {
    pub from: String,
    pub to: String,
    pub date: String,
}

impl From<&SegmentQuery> for SearchInfo {
    fn from(query: &SegmentQuery) -> Self {
        Self {
            from: query.from.clone(),
            to: query.to.clone(),
            date: query.date_param(),
        }
    }
}

/// Search results with the filter applied to them.
#[derive(Debug, Serialize)]
pub struct SegmentsResponse<R> {
    pub search: SearchInfo,
    pub criteria: FilterCriteria,

    #[serde(flatten)]
    pub snapshot: Snapshot<R>,
}

/// One departure-time checkbox on the filter form.
#[derive(Debug, Serialize)]
pub struct IntervalOption {
    pub value: DepartureInterval,
    pub title: &'static str,
}

/// Choices offered by the filter form.
#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub intervals: Vec<IntervalOption>,
    pub transfers: [TransferVisibility; 2],
}

impl Default for FilterOptionsResponse {
    fn default() -> Self {
        Self {
            intervals: DepartureInterval::ALL
                .iter()
                .map(|&value| IntervalOption {
                    value,
                    title: value.title(),
                })
                .collect(),
            transfers: [TransferVisibility::Show, TransferVisibility::Hide],
        }
    }
}

/// The story strip.
#[derive(Debug, Serialize)]
pub struct StoriesResponse {
    pub stories: Vec<StoryPreview>,
}

/// A page in the story viewer.
#[derive(Debug, Serialize)]
pub struct StoryPageView {
    pub story_id: u32,
    pub page: usize,
    pub page_count: usize,

    #[serde(flatten)]
    pub content: StoryPage,
}

/// Where the viewer ended up after a step; `current` is absent once finished.
#[derive(Debug, Serialize)]
pub struct StoryStepResponse {
    pub moved: CursorMove,
    pub current: Option<StoryPageView>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
