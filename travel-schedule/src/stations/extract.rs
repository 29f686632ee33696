//! City and station lists derived from the all-stations listing.

use std::collections::BTreeSet;

use crate::domain::StationItem;
use crate::rasp::{AllStationsResponse, Country, Settlement, Station};

/// Selects the country whose cities are offered.
///
/// Exact names are tried first (case-insensitive); if none matches, the
/// first country whose title contains one of the stems is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFilter {
    names: Vec<String>,
    stems: Vec<String>,
}

impl CountryFilter {
    pub fn new(
        names: impl IntoIterator<Item = impl Into<String>>,
        stems: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            names: names.into_iter().map(|n| n.into().to_lowercase()).collect(),
            stems: stems.into_iter().map(|s| s.into().to_lowercase()).collect(),
        }
    }

    /// Match one country by exact title only.
    pub fn exact(name: impl Into<String>) -> Self {
        Self::new([name.into()], Vec::<String>::new())
    }

    /// Russia, under the titles the API uses in either language.
    pub fn russia() -> Self {
        Self::new(["россия", "russia", "russian federation"], ["рос", "russ"])
    }

    /// Pick the matching country from the listing.
    pub fn select<'a>(&self, response: &'a AllStationsResponse) -> Option<&'a Country> {
        let countries = response.countries.as_deref().unwrap_or_default();
        let title = |c: &Country| c.title.as_deref().unwrap_or_default().to_lowercase();

        countries
            .iter()
            .find(|c| self.names.contains(&title(*c)))
            .or_else(|| {
                countries
                    .iter()
                    .find(|c| self.stems.iter().any(|s| title(*c).contains(s.as_str())))
            })
    }
}

impl Default for CountryFilter {
    fn default() -> Self {
        Self::russia()
    }
}

fn settlements(country: &Country) -> impl Iterator<Item = &Settlement> {
    country
        .regions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .flat_map(|r| r.settlements.as_deref().unwrap_or_default())
}

/// Deduplicated, sorted settlement titles of the selected country.
pub fn extract_cities(response: &AllStationsResponse, country: &CountryFilter) -> Vec<String> {
    let Some(country) = country.select(response) else {
        return Vec::new();
    };

    settlements(country)
        .filter_map(|s| s.title.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Deduplicated stations of one city, sorted by title.
///
/// Stations without a code or a title are dropped, as are service entries
/// whose title starts with `#`.
pub fn extract_stations(
    response: &AllStationsResponse,
    country: &CountryFilter,
    city: &str,
) -> Vec<StationItem> {
    let Some(country) = country.select(response) else {
        return Vec::new();
    };
    let Some(settlement) = settlements(country).find(|s| s.title.as_deref().map(str::trim) == Some(city.trim())) else {
        return Vec::new();
    };

    settlement
        .stations
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(station_item)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn station_item(station: &Station) -> Option<StationItem> {
    let code = station
        .codes
        .as_ref()
        .and_then(|c| c.yandex_code.as_deref())
        .or(station.code.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())?;

    // The API sends empty strings for unknown titles, so take the first
    // non-blank one rather than the first present one.
    let title = [&station.popular_title, &station.title, &station.short_title]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .map(str::trim)
        .find(|t| !t.is_empty())?;

    if title.starts_with('#') {
        return None;
    }

    Some(StationItem::new(title, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasp::{Codes, Region};

    fn station(title: &str, code: &str) -> Station {
        Station {
            title: Some(title.to_string()),
            codes: Some(Codes {
                yandex_code: Some(code.to_string()),
                esr_code: None,
            }),
            ..Station::default()
        }
    }

    fn settlement(title: &str, stations: Vec<Station>) -> Settlement {
        Settlement {
            title: Some(title.to_string()),
            codes: None,
            stations: Some(stations),
        }
    }

    fn listing(countries: Vec<(&str, Vec<Settlement>)>) -> AllStationsResponse {
        AllStationsResponse {
            countries: Some(
                countries
                    .into_iter()
                    .map(|(title, settlements)| Country {
                        title: Some(title.to_string()),
                        codes: None,
                        regions: Some(vec![Region {
                            title: None,
                            codes: None,
                            settlements: Some(settlements),
                        }]),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn cities_sorted_and_deduplicated() {
        let response = listing(vec![
            (
                "Россия",
                vec![
                    settlement("Пермь", vec![]),
                    settlement(" Москва ", vec![]),
                    settlement("", vec![]),
                    settlement("Пермь", vec![]),
                ],
            ),
            ("Беларусь", vec![settlement("Минск", vec![])]),
        ]);

        assert_eq!(
            extract_cities(&response, &CountryFilter::russia()),
            vec!["Москва", "Пермь"]
        );
    }

    #[test]
    fn country_stem_fallback() {
        let response = listing(vec![
            ("Беларусь", vec![settlement("Минск", vec![])]),
            ("Российская Федерация", vec![settlement("Казань", vec![])]),
        ]);

        assert_eq!(
            extract_cities(&response, &CountryFilter::russia()),
            vec!["Казань"]
        );
        assert!(extract_cities(&response, &CountryFilter::exact("Россия")).is_empty());
    }

    #[test]
    fn other_country_by_name() {
        let response = listing(vec![
            ("Россия", vec![settlement("Москва", vec![])]),
            ("Беларусь", vec![settlement("Минск", vec![])]),
        ]);

        assert_eq!(
            extract_cities(&response, &CountryFilter::exact("беларусь")),
            vec!["Минск"]
        );
    }

    #[test]
    fn stations_filtered_and_deduplicated() {
        let response = listing(vec![(
            "Россия",
            vec![settlement(
                "Москва",
                vec![
                    station("#Служебная", "s1"),
                    station("Вокзал", "s2"),
                    station("", "s3"),
                    station("Вокзал", "s2"),
                ],
            )],
        )]);

        let stations = extract_stations(&response, &CountryFilter::russia(), "Москва");
        let titles: Vec<_> = stations.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Вокзал"]);
        assert_eq!(stations[0].code, "s2");
    }

    #[test]
    fn stations_need_code() {
        let mut no_code = station("Без кода", "  ");
        no_code.code = None;
        let mut legacy = station("Старый код", "");
        legacy.codes = None;
        legacy.code = Some("s77".into());

        let response = listing(vec![("Россия", vec![settlement("Пермь", vec![no_code, legacy])])]);

        let stations = extract_stations(&response, &CountryFilter::russia(), "Пермь");
        assert_eq!(stations, vec![StationItem::new("Старый код", "s77")]);
    }

    #[test]
    fn popular_title_preferred_when_present() {
        let mut s = station("Пермь II", "s9");
        s.popular_title = Some("Пермь-2".into());
        let mut blank_popular = station("Пермь I", "s8");
        blank_popular.popular_title = Some("".into());

        let response = listing(vec![("Россия", vec![settlement("Пермь", vec![s, blank_popular])])]);

        let titles: Vec<_> = extract_stations(&response, &CountryFilter::russia(), "Пермь")
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Пермь I", "Пермь-2"]);
    }

    #[test]
    fn unknown_city_is_empty() {
        let response = listing(vec![("Россия", vec![settlement("Москва", vec![station("A", "s1")])])]);
        assert!(extract_stations(&response, &CountryFilter::russia(), "Тверь").is_empty());
        assert!(extract_stations(&AllStationsResponse::default(), &CountryFilter::russia(), "Москва").is_empty());
    }
}
