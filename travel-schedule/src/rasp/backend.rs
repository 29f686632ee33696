//! Runtime choice between the live API and local fixtures.

use std::sync::Arc;

use super::api::{ScheduleApi, SegmentQuery};
use super::client::RaspClient;
use super::error::RaspError;
use super::mock::MockRaspClient;
use super::types::{AllStationsResponse, CarrierResponse, Segments};

#[derive(Debug, Clone)]
pub enum Backend {
    Live(RaspClient),
    Mock(MockRaspClient),
}

impl ScheduleApi for Backend {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Segments, RaspError> {
        match self {
            Backend::Live(client) => ScheduleApi::search_segments(client, query).await,
            Backend::Mock(client) => ScheduleApi::search_segments(client, query).await,
        }
    }

    async fn all_stations(&self) -> Result<Arc<AllStationsResponse>, RaspError> {
        match self {
            Backend::Live(client) => ScheduleApi::all_stations(client).await,
            Backend::Mock(client) => ScheduleApi::all_stations(client).await,
        }
    }

    async fn carrier_info(&self, code: &str) -> Result<CarrierResponse, RaspError> {
        match self {
            Backend::Live(client) => ScheduleApi::carrier_info(client, code).await,
            Backend::Mock(client) => ScheduleApi::carrier_info(client, code).await,
        }
    }
}

impl From<RaspClient> for Backend {
    fn from(client: RaspClient) -> Self {
        Backend::Live(client)
    }
}

impl From<MockRaspClient> for Backend {
    fn from(client: MockRaspClient) -> Self {
        Backend::Mock(client)
    }
}
