//! The schedule API seam.
//!
//! Controllers depend on [`ScheduleApi`] rather than a concrete client, so
//! the HTTP client, the caching wrapper, the file-backed mock and test
//! doubles are interchangeable.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;

use super::error::RaspError;
use super::types::{AllStationsResponse, CarrierResponse, Segments};

/// Parameters of a route search between two points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentQuery {
    /// Origin code (station `s…` or settlement `c…`).
    pub from: String,
    /// Destination code.
    pub to: String,
    /// Travel date.
    pub date: NaiveDate,
}

impl SegmentQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            date,
        }
    }

    /// The date in the request format (`yyyy-MM-dd`).
    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Operations the app consumes from the schedule API.
pub trait ScheduleApi: Send + Sync {
    /// Scheduled legs between two points on a date.
    fn search_segments(
        &self,
        query: &SegmentQuery,
    ) -> impl Future<Output = Result<Segments, RaspError>> + Send;

    /// The full country → region → settlement → station listing.
    fn all_stations(
        &self,
    ) -> impl Future<Output = Result<Arc<AllStationsResponse>, RaspError>> + Send;

    /// Carrier profile by code.
    fn carrier_info(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<CarrierResponse, RaspError>> + Send;
}

impl<T: ScheduleApi> ScheduleApi for Arc<T> {
    fn search_segments(
        &self,
        query: &SegmentQuery,
    ) -> impl Future<Output = Result<Segments, RaspError>> + Send {
        (**self).search_segments(query)
    }

    fn all_stations(
        &self,
    ) -> impl Future<Output = Result<Arc<AllStationsResponse>, RaspError>> + Send {
        (**self).all_stations()
    }

    fn carrier_info(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<CarrierResponse, RaspError>> + Send {
        (**self).carrier_info(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_param_format() {
        let query = SegmentQuery::new(
            "c213",
            "c2",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        assert_eq!(query.date_param(), "2024-03-05");
    }
}
