use std::error::Error;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use travel_schedule::cache::CachedRaspClient;
use travel_schedule::config::{AppConfig, DataSource};
use travel_schedule::rasp::{Backend, MockRaspClient, RaspClient};
use travel_schedule::stations::{DiskCachedApi, StationCache};
use travel_schedule::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("travel_schedule=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let backend: Backend = match &config.source {
        DataSource::Live(rasp) => {
            info!(base_url = %rasp.base_url, lang = %rasp.lang, "using live schedule API");
            RaspClient::new(rasp.clone())?.into()
        }
        DataSource::Mock(dir) => {
            info!(dir = %dir.display(), "serving schedule fixtures");
            MockRaspClient::new(dir)?.into()
        }
    };

    // Memory cache in front of the disk cache in front of the network
    let disk = DiskCachedApi::new(backend, StationCache::new(config.stations_cache.clone()));
    let api = Arc::new(CachedRaspClient::new(disk, &config.cache));

    let state = AppState::new(api, config.country.clone(), config.controller);

    // Warm the station listing so the first picker opens quickly
    state.cities.load();

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "travel schedule listening");

    axum::serve(listener, app).await?;
    Ok(())
}
