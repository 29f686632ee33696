//! Conversion from API DTOs to display rows.

use crate::domain::format::{
    day_month, duration_human, minutes_from_midnight, parse_timestamp, time_hhmm,
};
use crate::domain::{CarrierDetails, CarrierRow, DEFAULT_CARRIER_TITLE, non_blank};

use super::types::{CarrierResponse, Segment, Segments};

/// Separator between leg endpoints in a thread title.
const THREAD_SEPARATOR: &str = " — ";

/// Map a search response to result rows, in API order.
pub fn segments_to_rows(response: &Segments) -> Vec<CarrierRow> {
    response
        .segments
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, segment)| segment_to_row(index, segment))
        .collect()
}

fn segment_to_row(index: usize, segment: &Segment) -> CarrierRow {
    let thread = segment.thread.as_ref();
    let carrier = thread.and_then(|t| t.carrier.as_ref());

    let departure = segment.departure.as_deref().and_then(parse_timestamp);
    let arrival = segment.arrival.as_deref().and_then(parse_timestamp);

    let thread_title = thread.and_then(|t| t.title.as_deref()).unwrap_or_default();
    let parts: Vec<&str> = thread_title.split(THREAD_SEPARATOR).collect();
    let has_transfers = parts.len() > 2;
    let subtitle = has_transfers.then(|| format!("С пересадкой в {}", parts[1]));

    let uid = thread
        .and_then(|t| t.uid.clone())
        .unwrap_or_else(|| format!("segment-{index}"));
    let departure_key = departure
        .map(|d| d.timestamp().to_string())
        .unwrap_or_else(|| index.to_string());

    CarrierRow {
        id: format!("{uid}_{departure_key}"),
        title: non_blank(carrier.and_then(|c| c.title.as_deref()))
            .unwrap_or_else(|| DEFAULT_CARRIER_TITLE.to_string()),
        carrier_code: non_blank(carrier.and_then(|c| c.code.as_deref())),
        subtitle,
        date_text: departure.as_ref().map(day_month),
        depart_text: departure.as_ref().map(time_hhmm),
        arrive_text: arrival.as_ref().map(time_hhmm),
        duration_text: segment
            .duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| duration_human(d as u64)),
        logo_url: non_blank(carrier.and_then(|c| c.logo.as_deref())),
        depart_minutes: departure.as_ref().map(minutes_from_midnight),
        has_transfers,
    }
}

/// Project a carrier response onto the info screen model.
pub fn carrier_details(response: &CarrierResponse) -> CarrierDetails {
    let Some(carrier) = response.first() else {
        return CarrierDetails::default();
    };

    CarrierDetails {
        title: non_blank(carrier.title.as_deref())
            .unwrap_or_else(|| DEFAULT_CARRIER_TITLE.to_string()),
        logo_url: non_blank(carrier.logo.as_deref()),
        email: non_blank(carrier.email.as_deref()),
        phone: non_blank(carrier.phone.as_deref()),
        website: non_blank(carrier.url.as_deref()),
    }
}
