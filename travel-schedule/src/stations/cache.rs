//! Disk-based cache for the all-stations listing.
//!
//! The listing is tens of megabytes and changes rarely, so it is kept on
//! disk between runs and only refetched once it expires.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::rasp::{AllStationsResponse, CarrierResponse, RaspError, ScheduleApi, SegmentQuery, Segments};

use super::error::StationCacheError;

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached listing with metadata.
#[derive(Debug, Serialize, Deserialize)]
struct CachedStations {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    /// The cached listing.
    stations: AllStationsResponse,
}

/// Configuration for the station disk cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache remains valid.
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Create a new cache config with the given path and default TTL (24 hours).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new("stations_cache.json")
    }
}

/// Disk cache for the station listing.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// Try to load the listing from the cache.
    ///
    /// Returns `None` if the cache doesn't exist, is invalid, or has expired.
    pub fn load(&self) -> Option<AllStationsResponse> {
        let contents = std::fs::read(&self.config.path).ok()?;
        let cached: CachedStations = serde_json::from_slice(&contents).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        let age_secs = now.saturating_sub(cached.cached_at_secs);
        if age_secs >= self.config.ttl.as_secs() {
            return None;
        }

        Some(cached.stations)
    }

    /// Save the listing to the cache.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, stations: &AllStationsResponse) -> Result<(), StationCacheError> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| StationCacheError::Io {
                message: "system time before unix epoch".to_string(),
            })?
            .as_secs();

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StationCacheError::Io {
                message: format!("failed to create cache directory: {e}"),
            })?;
        }

        #[derive(Serialize)]
        struct CachedStationsRef<'a> {
            cached_at_secs: u64,
            stations: &'a AllStationsResponse,
        }

        let json = serde_json::to_vec(&CachedStationsRef {
            cached_at_secs: now,
            stations,
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| StationCacheError::Io {
            message: format!("failed to write cache file: {e}"),
        })?;

        Ok(())
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

/// Schedule API wrapper that serves the station listing from disk when fresh.
///
/// Other calls pass straight through.
#[derive(Debug, Clone)]
pub struct DiskCachedApi<A> {
    inner: A,
    cache: StationCache,
}

impl<A: ScheduleApi> DiskCachedApi<A> {
    pub fn new(inner: A, cache: StationCache) -> Self {
        Self { inner, cache }
    }
}

impl<A: ScheduleApi> ScheduleApi for DiskCachedApi<A> {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Segments, RaspError> {
        self.inner.search_segments(query).await
    }

    async fn all_stations(&self) -> Result<Arc<AllStationsResponse>, RaspError> {
        let cache = self.cache.clone();
        let cached = tokio::task::spawn_blocking(move || cache.load())
            .await
            .ok()
            .flatten();
        if let Some(stations) = cached {
            debug!(path = %self.cache.path().display(), "station listing served from disk");
            return Ok(Arc::new(stations));
        }

        let stations = self.inner.all_stations().await?;

        let cache = self.cache.clone();
        let to_save = Arc::clone(&stations);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = cache.save(&to_save) {
                warn!(error = %e, "failed to persist station listing");
            }
        });

        Ok(stations)
    }

    async fn carrier_info(&self, code: &str) -> Result<CarrierResponse, RaspError> {
        self.inner.carrier_info(code).await
    }
}
