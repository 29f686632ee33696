//! Client-side filter criteria for search results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::rows::CarrierRow;

/// Departure time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureInterval {
    Morning,
    Day,
    Evening,
    Night,
}

impl DepartureInterval {
    pub const ALL: [DepartureInterval; 4] = [
        DepartureInterval::Morning,
        DepartureInterval::Day,
        DepartureInterval::Evening,
        DepartureInterval::Night,
    ];

    /// Checkbox label.
    pub fn title(self) -> &'static str {
        match self {
            DepartureInterval::Morning => "Утро 06:00 - 12:00",
            DepartureInterval::Day => "День 12:00 - 18:00",
            DepartureInterval::Evening => "Вечер 18:00 - 00:00",
            DepartureInterval::Night => "Ночь 00:00 - 06:00",
        }
    }

    /// Whether a minutes-from-midnight value falls in this bucket.
    pub fn contains(self, minutes: u16) -> bool {
        let (start, end) = match self {
            DepartureInterval::Night => (0, 6 * 60),
            DepartureInterval::Morning => (6 * 60, 12 * 60),
            DepartureInterval::Day => (12 * 60, 18 * 60),
            DepartureInterval::Evening => (18 * 60, 24 * 60),
        };
        (start..end).contains(&minutes)
    }
}

/// Whether journeys with transfers should be listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferVisibility {
    /// User has not chosen; nothing is filtered.
    #[default]
    Unspecified,
    Show,
    Hide,
}

/// The user's filter selection on the results screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Accepted departure buckets; empty accepts any time.
    #[serde(default)]
    pub intervals: BTreeSet<DepartureInterval>,

    #[serde(default)]
    pub transfers: TransferVisibility,
}

impl FilterCriteria {
    pub fn new(
        intervals: impl IntoIterator<Item = DepartureInterval>,
        transfers: TransferVisibility,
    ) -> Self {
        Self {
            intervals: intervals.into_iter().collect(),
            transfers,
        }
    }

    /// Whether the filter form has a complete selection.
    pub fn can_apply(&self) -> bool {
        !self.intervals.is_empty() && self.transfers != TransferVisibility::Unspecified
    }

    /// Whether a row passes this filter.
    ///
    /// With intervals selected, rows without a departure time never match.
    pub fn matches(&self, row: &CarrierRow) -> bool {
        if !self.intervals.is_empty() {
            let Some(minutes) = row.depart_minutes else {
                return false;
            };
            if !self.intervals.iter().any(|i| i.contains(minutes)) {
                return false;
            }
        }

        match self.transfers {
            TransferVisibility::Hide => !row.has_transfers,
            TransferVisibility::Show | TransferVisibility::Unspecified => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(criteria: &FilterCriteria, rows: &[CarrierRow]) -> Vec<CarrierRow> {
        rows.iter().filter(|r| criteria.matches(r)).cloned().collect()
    }

    fn row(id: &str, minutes: Option<u16>, has_transfers: bool) -> CarrierRow {
        CarrierRow {
            id: id.to_string(),
            depart_minutes: minutes,
            has_transfers,
            ..CarrierRow::default()
        }
    }

    #[test]
    fn interval_boundaries() {
        assert!(DepartureInterval::Night.contains(0));
        assert!(DepartureInterval::Night.contains(359));
        assert!(DepartureInterval::Morning.contains(360));
        assert!(DepartureInterval::Morning.contains(719));
        assert!(DepartureInterval::Day.contains(720));
        assert!(DepartureInterval::Evening.contains(1439));
        assert!(!DepartureInterval::Evening.contains(1440));
    }

    #[test]
    fn every_minute_in_exactly_one_interval() {
        for m in 0..1440u16 {
            let count = DepartureInterval::ALL.iter().filter(|i| i.contains(m)).count();
            assert_eq!(count, 1, "minute {m}");
        }
    }

    #[test]
    fn default_criteria_accepts_everything() {
        let rows = vec![row("a", None, true), row("b", Some(600), false)];
        assert_eq!(apply(&FilterCriteria::default(), &rows).len(), 2);
    }

    #[test]
    fn intervals_reject_rows_without_time() {
        let criteria = FilterCriteria::new([DepartureInterval::Morning], TransferVisibility::Show);
        let rows = vec![row("a", None, false), row("b", Some(7 * 60), false), row("c", Some(13 * 60), false)];
        let ids: Vec<_> = apply(&criteria, &rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn hide_transfers() {
        let criteria = FilterCriteria::new([], TransferVisibility::Hide);
        let rows = vec![row("a", Some(60), true), row("b", Some(60), false)];
        let ids: Vec<_> = apply(&criteria, &rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b"]);

        let show = FilterCriteria::new([], TransferVisibility::Show);
        assert_eq!(apply(&show, &rows).len(), 2);
    }

    #[test]
    fn can_apply_requires_both_choices() {
        assert!(!FilterCriteria::default().can_apply());
        assert!(!FilterCriteria::new([DepartureInterval::Day], TransferVisibility::Unspecified).can_apply());
        assert!(!FilterCriteria::new([], TransferVisibility::Hide).can_apply());
        assert!(FilterCriteria::new([DepartureInterval::Day], TransferVisibility::Hide).can_apply());
    }

    #[test]
    fn deserializes_from_form_json() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"intervals": ["morning", "night"], "transfers": "hide"}"#).unwrap();
        assert_eq!(criteria.intervals.len(), 2);
        assert_eq!(criteria.transfers, TransferVisibility::Hide);

        let criteria: FilterCriteria = serde_json::from_str("{}").unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }
}
