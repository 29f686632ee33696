//! Display formatting for schedule times.
//!
//! Requests use `yyyy-MM-dd`; everything here is for display only and
//! produces Russian text.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Parse an API timestamp, keeping its own UTC offset.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// "HH:mm" in the timestamp's own offset.
pub fn time_hhmm(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M").to_string()
}

/// "d MMMM", e.g. "5 марта".
pub fn day_month(t: &DateTime<FixedOffset>) -> String {
    format!("{} {}", t.day(), MONTHS_GENITIVE[t.month0() as usize])
}

/// Minutes since local midnight.
pub fn minutes_from_midnight(t: &DateTime<FixedOffset>) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// "N ч M м", "N ч" or "M м".
pub fn duration_human(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    match (h, m) {
        (0, m) => format!("{m} м"),
        (h, 0) => format!("{h} ч"),
        (h, m) => format!("{h} ч {m} м"),
    }
}

/// Today's date in UTC, which is what the search request is keyed on.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
