//! Station listing: extraction and persistence.
//!
//! Both pickers work from the same all-stations document: the city picker
//! lists the settlements of one country, the station picker lists the
//! stations of one settlement.

mod cache;
mod error;
mod extract;

pub use cache::{DiskCachedApi, StationCache, StationCacheConfig};
pub use error::StationCacheError;
pub use extract::{CountryFilter, extract_cities, extract_stations};
