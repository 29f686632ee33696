//! Screen controllers.
//!
//! Every list screen runs the same cycle: fetch the dataset, classify
//! failures, retry connectivity failures with capped backoff, and hold the
//! result for client-side filtering. [`ListController`] implements that
//! cycle once; each screen supplies a [`ListSource`] describing where its
//! rows come from and how they are filtered.

mod backoff;
mod carrier;
mod config;
mod debounce;
mod list;
mod picker;
mod sources;

pub use backoff::RetryPolicy;
pub use carrier::CarrierInfoController;
pub use config::{ControllerConfig, DEFAULT_DEBOUNCE_MS};
pub use debounce::Debounce;
pub use list::{ListController, ListSource, LoadHandle, Snapshot};
pub use picker::Picker;
pub use sources::{
    CarrierInfoSource, CitySource, NO_CARRIER_CODE, SegmentSource, StationSource, matches_query,
};

use crate::rasp::{ScheduleApi, SegmentQuery};
use crate::stations::CountryFilter;

pub type CityPicker<A> = Picker<CitySource<A>>;
pub type StationPicker<A> = Picker<StationSource<A>>;
pub type CarrierList<A> = ListController<SegmentSource<A>>;

/// City picker for one country.
pub fn city_picker<A: ScheduleApi + 'static>(
    api: A,
    country: CountryFilter,
    config: &ControllerConfig,
) -> CityPicker<A> {
    Picker::new(
        ListController::new(CitySource::new(api, country), config.retry),
        config.debounce,
    )
}

/// Station picker for one city.
pub fn station_picker<A: ScheduleApi + 'static>(
    api: A,
    country: CountryFilter,
    city: impl Into<String>,
    config: &ControllerConfig,
) -> StationPicker<A> {
    Picker::new(
        ListController::new(StationSource::new(api, country, city), config.retry),
        config.debounce,
    )
}

/// Search results for one route and day.
pub fn carrier_list<A: ScheduleApi + 'static>(
    api: A,
    query: SegmentQuery,
    config: &ControllerConfig,
) -> CarrierList<A> {
    ListController::new(SegmentSource::new(api, query), config.retry)
}
