//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::cache::CachedRaspClient;
use crate::controller::{
    CarrierList, CityPicker, ControllerConfig, StationPicker, carrier_list, city_picker,
    station_picker,
};
use crate::rasp::{Backend, SegmentQuery};
use crate::stations::{CountryFilter, DiskCachedApi};
use crate::stories::StoriesStore;

/// The API stack every controller reads through.
pub type AppApi = Arc<CachedRaspClient<DiskCachedApi<Backend>>>;

/// How long an unused screen controller is kept.
const CONTROLLER_IDLE: Duration = Duration::from_secs(10 * 60);

/// Maximum number of live controllers per screen kind.
const MAX_CONTROLLERS: u64 = 256;

/// Shared application state.
///
/// Screens with parameters (a city's stations, a route's results) get one
/// controller per parameter set, created on first use and dropped after
/// sitting idle. Dropping a controller aborts its in-flight load.
#[derive(Clone)]
pub struct AppState {
    pub api: AppApi,
    pub country: CountryFilter,
    pub controller: ControllerConfig,
    pub cities: Arc<CityPicker<AppApi>>,
    pub stations: MokaCache<String, Arc<StationPicker<AppApi>>>,
    pub segments: MokaCache<SegmentQuery, Arc<CarrierList<AppApi>>>,
    pub stories: Arc<StoriesStore>,
}

impl AppState {
    pub fn new(api: AppApi, country: CountryFilter, controller: ControllerConfig) -> Self {
        let cities = city_picker(Arc::clone(&api), country.clone(), &controller);
        Self {
            api,
            country,
            controller,
            cities: Arc::new(cities),
            stations: MokaCache::builder()
                .time_to_idle(CONTROLLER_IDLE)
                .max_capacity(MAX_CONTROLLERS)
                .build(),
            segments: MokaCache::builder()
                .time_to_idle(CONTROLLER_IDLE)
                .max_capacity(MAX_CONTROLLERS)
                .build(),
            stories: Arc::new(StoriesStore::new()),
        }
    }

    /// The station picker for `city`, created on first use.
    pub async fn station_picker(&self, city: &str) -> Arc<StationPicker<AppApi>> {
        let city = city.trim().to_string();
        self.stations
            .get_with(city.clone(), async move {
                Arc::new(station_picker(
                    Arc::clone(&self.api),
                    self.country.clone(),
                    city,
                    &self.controller,
                ))
            })
            .await
    }

    /// The result list for `query`, created on first use.
    pub async fn carrier_list(&self, query: SegmentQuery) -> Arc<CarrierList<AppApi>> {
        self.segments
            .get_with(query.clone(), async move {
                Arc::new(carrier_list(Arc::clone(&self.api), query, &self.controller))
            })
            .await
    }
}
