//! Mock schedule client for working without API access.
//!
//! Serves responses from JSON files as if they were live API responses.
//! Expected layout:
//!
//! ```text
//! <dir>/all_stations.json
//! <dir>/segments/<from>_<to>.json
//! <dir>/carriers/<code>.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::api::{ScheduleApi, SegmentQuery};
use super::error::RaspError;
use super::types::{AllStationsResponse, CarrierResponse, Segments};

/// Schedule client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockRaspClient {
    data_dir: PathBuf,
}

impl MockRaspClient {
    /// Create a mock client over a fixture directory.
    ///
    /// Fails if the directory lacks `all_stations.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, RaspError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.join("all_stations.json").is_file() {
            return Err(RaspError::NotFound(format!(
                "no all_stations.json in {}",
                data_dir.display()
            )));
        }
        Ok(Self { data_dir })
    }

    /// A request-supplied path component, refused if it could leave its directory.
    fn component(part: &str) -> Result<&str, RaspError> {
        if part.is_empty() || part.contains(['/', '\\']) || part.contains("..") {
            return Err(RaspError::NotFound(format!("invalid code {part:?}")));
        }
        Ok(part)
    }

    async fn read<T: DeserializeOwned>(&self, path: PathBuf) -> Result<T, RaspError> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|_| RaspError::NotFound(path.display().to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RaspError::json(&e, &bytes))
    }
}

impl ScheduleApi for MockRaspClient {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Segments, RaspError> {
        let path = self
            .data_dir
            .join("segments")
            .join(format!(
                "{}_{}.json",
                Self::component(&query.from)?,
                Self::component(&query.to)?
            ));

        // Like the live API, an unknown route is an empty result
        if !path.is_file() {
            return Ok(Segments::empty());
        }
        self.read(path).await
    }

    async fn all_stations(&self) -> Result<Arc<AllStationsResponse>, RaspError> {
        self.read(self.data_dir.join("all_stations.json"))
            .await
            .map(Arc::new)
    }

    async fn carrier_info(&self, code: &str) -> Result<CarrierResponse, RaspError> {
        let code = Self::component(code)?;
        self.read(self.data_dir.join("carriers").join(format!("{code}.json")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("all_stations.json"),
            r#"{"countries": [{"title": "Россия", "regions": []}]}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("segments")).unwrap();
        std::fs::write(
            dir.path().join("segments").join("c213_c2.json"),
            r#"{"segments": [{"departure": "2024-01-15T10:00:00+03:00"}]}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("carriers")).unwrap();
        std::fs::write(
            dir.path().join("carriers").join("112.json"),
            r#"{"carrier": {"code": 112, "title": "РЖД"}}"#,
        )
        .unwrap();
        dir
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn serves_fixtures() {
        let dir = fixture_dir();
        let client = MockRaspClient::new(dir.path()).unwrap();

        let stations = client.all_stations().await.unwrap();
        assert_eq!(stations.countries.as_ref().map(Vec::len), Some(1));

        let segments = client
            .search_segments(&SegmentQuery::new("c213", "c2", date()))
            .await
            .unwrap();
        assert_eq!(segments.segments.map(|s| s.len()), Some(1));

        let carrier = client.carrier_info("112").await.unwrap();
        assert_eq!(carrier.first().and_then(|c| c.title.as_deref()), Some("РЖД"));
    }

    #[tokio::test]
    async fn unknown_route_is_empty() {
        let dir = fixture_dir();
        let client = MockRaspClient::new(dir.path()).unwrap();

        let segments = client
            .search_segments(&SegmentQuery::new("c1", "c2", date()))
            .await
            .unwrap();
        assert_eq!(segments.segments.map(|s| s.len()), Some(0));
    }

    #[tokio::test]
    async fn unknown_carrier_is_not_found() {
        let dir = fixture_dir();
        let client = MockRaspClient::new(dir.path()).unwrap();

        let err = client.carrier_info("999").await.unwrap_err();
        assert!(matches!(err, RaspError::NotFound(_)));
        assert!(!err.is_connectivity());
    }

    #[tokio::test]
    async fn codes_cannot_leave_fixture_dirs() {
        let dir = fixture_dir();
        let client = MockRaspClient::new(dir.path()).unwrap();

        let err = client.carrier_info("../carriers/112").await.unwrap_err();
        assert!(matches!(err, RaspError::NotFound(_)));

        let err = client
            .search_segments(&SegmentQuery::new("../segments/c213", "c2", date()))
            .await
            .unwrap_err();
        assert!(matches!(err, RaspError::NotFound(_)));

        assert!(client.carrier_info("..").await.is_err());
    }

    #[test]
    fn missing_directory_rejected() {
        let dir = tempdir().unwrap();
        assert!(MockRaspClient::new(dir.path()).is_err());
    }
}
