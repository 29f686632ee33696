//! Schedule API response DTOs.
//!
//! These types map directly to the JSON returned by the schedule API.
//! Almost everything is `Option` because the API omits fields freely and
//! sends empty strings where a value is unknown.

use serde::{Deserialize, Deserializer, Serialize};

/// Response from the route search (`/v3.0/search/`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Segments {
    /// Scheduled legs between the two points.
    #[serde(default)]
    pub segments: Option<Vec<Segment>>,
}

impl Segments {
    /// The empty result, used when the API answers 404.
    pub fn empty() -> Self {
        Self {
            segments: Some(Vec::new()),
        }
    }
}

/// One scheduled leg between two points.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Segment {
    /// Route the leg belongs to.
    pub thread: Option<Thread>,

    /// Departure timestamp (ISO 8601 with offset).
    pub departure: Option<String>,

    /// Arrival timestamp (ISO 8601 with offset).
    pub arrival: Option<String>,

    /// Travel time in seconds. The API sends this as a float.
    pub duration: Option<f64>,

    /// Date the thread starts on (yyyy-MM-dd).
    pub start_date: Option<String>,

    /// Whether the API itself considers the leg to involve transfers.
    pub has_transfers: Option<bool>,
}

/// A named route.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Thread {
    /// Stable thread identifier.
    pub uid: Option<String>,

    /// Route title, leg endpoints joined by " — ".
    pub title: Option<String>,

    /// Route number (e.g. "016А").
    pub number: Option<String>,

    /// Carrier operating the route.
    pub carrier: Option<Carrier>,

    /// Transport type (train, suburban, bus, plane, ...).
    pub transport_type: Option<String>,
}

/// Carrier profile, embedded in threads and returned by `/v3.0/carrier/`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Carrier {
    /// Carrier code. The API sends a number; stored as text.
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,

    pub title: Option<String>,
    pub logo: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub contacts: Option<String>,
    pub address: Option<String>,
}

/// Response from `/v3.0/carrier/`.
///
/// A single-code lookup returns `carrier`; ambiguous codes return
/// `carriers`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CarrierResponse {
    pub carrier: Option<Carrier>,
    pub carriers: Option<Vec<Carrier>>,
}

impl CarrierResponse {
    /// The first carrier in the response, wherever the API put it.
    pub fn first(&self) -> Option<&Carrier> {
        self.carriers
            .as_ref()
            .and_then(|c| c.first())
            .or(self.carrier.as_ref())
    }
}

/// Response from `/v3.0/stations_list/`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AllStationsResponse {
    pub countries: Option<Vec<Country>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Country {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub regions: Option<Vec<Region>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Region {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub settlements: Option<Vec<Settlement>>,
}

/// A city-level grouping of stations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settlement {
    pub title: Option<String>,
    pub codes: Option<Codes>,
    pub stations: Option<Vec<Station>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Station {
    pub title: Option<String>,
    pub popular_title: Option<String>,
    pub short_title: Option<String>,

    /// Legacy flat code; `codes.yandex_code` takes precedence.
    pub code: Option<String>,
    pub codes: Option<Codes>,

    pub station_type: Option<String>,
    pub transport_type: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Codes {
    pub yandex_code: Option<String>,
    pub esr_code: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
