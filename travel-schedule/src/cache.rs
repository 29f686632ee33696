//! In-memory caching layer for schedule API responses.
//!
//! The station listing is shared by every picker and is expensive to
//! download and decode, so it is cached for an hour. Route searches are
//! cached briefly so that reopening a results screen does not refetch.
//! Only successful responses are cached: failures always reach the caller,
//! which is what lets controllers notice lost connectivity.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::rasp::{AllStationsResponse, CarrierResponse, RaspError, ScheduleApi, SegmentQuery, Segments};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the station listing.
    pub stations_ttl: Duration,

    /// TTL for route search results.
    pub segments_ttl: Duration,

    /// TTL for carrier profiles.
    pub carriers_ttl: Duration,

    /// Maximum number of cached searches and carriers (each).
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stations_ttl: Duration::from_secs(60 * 60),
            segments_ttl: Duration::from_secs(60),
            carriers_ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Schedule client with caching.
///
/// Wraps any [`ScheduleApi`] implementation.
pub struct CachedRaspClient<A> {
    client: A,
    stations: MokaCache<(), Arc<AllStationsResponse>>,
    segments: MokaCache<SegmentQuery, Arc<Segments>>,
    carriers: MokaCache<String, Arc<CarrierResponse>>,
}

impl<A: ScheduleApi> CachedRaspClient<A> {
    /// Create a new cached client.
    pub fn new(client: A, config: &CacheConfig) -> Self {
        Self {
            client,
            stations: MokaCache::builder()
                .time_to_live(config.stations_ttl)
                .max_capacity(1)
                .build(),
            segments: MokaCache::builder()
                .time_to_live(config.segments_ttl)
                .max_capacity(config.max_capacity)
                .build(),
            carriers: MokaCache::builder()
                .time_to_live(config.carriers_ttl)
                .max_capacity(config.max_capacity)
                .build(),
        }
    }
}

impl<A: ScheduleApi> ScheduleApi for CachedRaspClient<A> {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Segments, RaspError> {
        if let Some(cached) = self.segments.get(query).await {
            debug!(from = %query.from, to = %query.to, "segments served from cache");
            return Ok((*cached).clone());
        }

        let segments = self.client.search_segments(query).await?;
        self.segments
            .insert(query.clone(), Arc::new(segments.clone()))
            .await;
        Ok(segments)
    }

    async fn all_stations(&self) -> Result<Arc<AllStationsResponse>, RaspError> {
        if let Some(cached) = self.stations.get(&()).await {
            debug!("station listing served from cache");
            return Ok(cached);
        }

        let stations = self.client.all_stations().await?;
        self.stations.insert((), Arc::clone(&stations)).await;
        Ok(stations)
    }

    async fn carrier_info(&self, code: &str) -> Result<CarrierResponse, RaspError> {
        if let Some(cached) = self.carriers.get(code).await {
            return Ok((*cached).clone());
        }

        let carrier = self.client.carrier_info(code).await?;
        self.carriers
            .insert(code.to_string(), Arc::new(carrier.clone()))
            .await;
        Ok(carrier)
    }
}
