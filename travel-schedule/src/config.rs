//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheConfig;
use crate::controller::ControllerConfig;
use crate::rasp::RaspConfig;
use crate::stations::{CountryFilter, StationCacheConfig};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RASP_API_KEY is not set (set RASP_MOCK_DIR to run against local fixtures)")]
    MissingApiKey,

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where schedule data comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// The live API.
    Live(RaspConfig),
    /// JSON fixtures in a directory.
    Mock(PathBuf),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: DataSource,
    pub bind_addr: SocketAddr,
    pub stations_cache: StationCacheConfig,
    pub country: CountryFilter,
    pub cache: CacheConfig,
    pub controller: ControllerConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let source = match var("RASP_MOCK_DIR") {
            Some(dir) => DataSource::Mock(PathBuf::from(dir)),
            None => {
                let api_key = var("RASP_API_KEY").ok_or(ConfigError::MissingApiKey)?;
                let mut rasp = RaspConfig::new(api_key);
                if let Some(url) = var("RASP_BASE_URL") {
                    rasp = rasp.with_base_url(url);
                }
                if let Some(lang) = var("RASP_LANG") {
                    rasp = rasp.with_lang(lang);
                }
                if let Some(secs) = var("RASP_TIMEOUT_SECS") {
                    let secs = secs.parse().map_err(|_| ConfigError::Invalid {
                        name: "RASP_TIMEOUT_SECS",
                        value: secs.clone(),
                    })?;
                    rasp = rasp.with_timeout(secs);
                }
                DataSource::Live(rasp)
            }
        };

        let bind = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind.clone(),
        })?;

        let stations_cache = var("STATIONS_CACHE_PATH")
            .map(StationCacheConfig::new)
            .unwrap_or_default();

        let country = var("RASP_COUNTRY")
            .map(CountryFilter::exact)
            .unwrap_or_default();

        Ok(Self {
            source,
            bind_addr,
            stations_cache,
            country,
            cache: CacheConfig::default(),
            controller: ControllerConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn api_key_required() {
        assert!(matches!(config(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            config(&[("RASP_API_KEY", "  ")]),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn defaults() {
        let config = config(&[("RASP_API_KEY", "secret")]).unwrap();

        let DataSource::Live(rasp) = &config.source else {
            panic!("expected live source");
        };
        assert_eq!(rasp.api_key, "secret");
        assert_eq!(rasp.base_url, "https://api.rasp.yandex-net.ru");
        assert_eq!(rasp.lang, "ru_RU");
        assert_eq!(rasp.timeout_secs, 30);

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.stations_cache.path, PathBuf::from("stations_cache.json"));
        assert_eq!(config.country, CountryFilter::russia());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("RASP_API_KEY", "secret"),
            ("RASP_BASE_URL", "http://localhost:9000"),
            ("RASP_LANG", "uk_UA"),
            ("RASP_TIMEOUT_SECS", "5"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("STATIONS_CACHE_PATH", "/tmp/stations.json"),
            ("RASP_COUNTRY", "Украина"),
        ])
        .unwrap();

        let DataSource::Live(rasp) = &config.source else {
            panic!("expected live source");
        };
        assert_eq!(rasp.base_url, "http://localhost:9000");
        assert_eq!(rasp.lang, "uk_UA");
        assert_eq!(rasp.timeout_secs, 5);
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.stations_cache.path, PathBuf::from("/tmp/stations.json"));
        assert_eq!(config.country, CountryFilter::exact("Украина"));
    }

    #[test]
    fn mock_dir_needs_no_key() {
        let config = config(&[("RASP_MOCK_DIR", "fixtures")]).unwrap();
        assert!(matches!(config.source, DataSource::Mock(ref dir) if dir == &PathBuf::from("fixtures")));
    }

    #[test]
    fn invalid_values() {
        let err = config(&[("RASP_API_KEY", "k"), ("RASP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "RASP_TIMEOUT_SECS", .. }));

        let err = config(&[("RASP_API_KEY", "k"), ("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BIND_ADDR", .. }));
    }
}
