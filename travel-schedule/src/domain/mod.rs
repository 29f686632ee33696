//! Domain types for the schedule browser.
//!
//! Everything here is pure data and pure functions: loading states, the
//! rows screens display, the filters applied to them and display
//! formatting. Nothing in this module performs I/O.

pub mod format;
mod filter;
mod route;
mod rows;
mod state;

pub use filter::{DepartureInterval, FilterCriteria, TransferVisibility};
pub use route::{RouteEnd, RouteSelection};
pub use rows::{CarrierDetails, CarrierRow, DEFAULT_CARRIER_TITLE, StationItem};
pub(crate) use rows::non_blank;
pub use state::LoadingState;
