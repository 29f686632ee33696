//! Display-ready projections of API entities.
//!
//! Rows are built once per successful fetch and never mutated.

use serde::Serialize;

/// Default carrier title when the API has none.
pub const DEFAULT_CARRIER_TITLE: &str = "Перевозчик";

/// A station selectable in the station picker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StationItem {
    pub title: String,
    pub code: String,
}

impl StationItem {
    pub fn new(title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
        }
    }
}

/// One search result on the carriers screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CarrierRow {
    /// Unique within one result set: thread uid and departure instant.
    pub id: String,

    /// Carrier name.
    pub title: String,

    /// Carrier code, for the carrier info screen.
    pub carrier_code: Option<String>,

    /// "С пересадкой в …" when the route has a transfer.
    pub subtitle: Option<String>,

    /// Departure date, e.g. "14 января".
    pub date_text: Option<String>,

    /// Departure time, "HH:mm".
    pub depart_text: Option<String>,

    /// Arrival time, "HH:mm".
    pub arrive_text: Option<String>,

    /// Travel time, e.g. "8 ч 49 м".
    pub duration_text: Option<String>,

    pub logo_url: Option<String>,

    /// Departure as minutes from local midnight; drives interval filters.
    pub depart_minutes: Option<u16>,

    pub has_transfers: bool,
}

/// Carrier profile shown on the carrier info screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierDetails {
    pub title: String,
    pub logo_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl Default for CarrierDetails {
    fn default() -> Self {
        Self {
            title: DEFAULT_CARRIER_TITLE.to_string(),
            logo_url: None,
            email: None,
            phone: None,
            website: None,
        }
    }
}

/// Trim a field, treating blank as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
