//! Schedule API client.
//!
//! HTTP client for the intercity schedule API, its response DTOs, the
//! conversion of responses into display rows and the [`ScheduleApi`] seam
//! that controllers are written against.
//!
//! Key characteristics of the API:
//! - Every call takes `apikey`, `lang` and `format` query parameters
//! - The all-stations listing is tens of megabytes and served as HTML
//! - Carrier codes are numbers in JSON but opaque strings everywhere else

mod api;
mod backend;
mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use api::{ScheduleApi, SegmentQuery};
pub use backend::Backend;
pub use client::{RaspClient, RaspConfig};
pub use convert::{carrier_details, segments_to_rows};
pub use error::RaspError;
pub use mock::MockRaspClient;
pub use types::{
    AllStationsResponse, Carrier, CarrierResponse, Codes, Country, Region, Segment, Segments,
    Settlement, Station, Thread,
};
