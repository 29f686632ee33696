//! The data sources behind each screen.

use tracing::debug;

use crate::domain::{CarrierDetails, CarrierRow, FilterCriteria, StationItem};
use crate::rasp::{RaspError, ScheduleApi, SegmentQuery, carrier_details, segments_to_rows};
use crate::stations::{CountryFilter, extract_cities, extract_stations};

use super::list::ListSource;

const GENERIC_ERROR: &str = "Ошибка загрузки";

/// Shown when the carrier info screen is opened without a carrier code.
pub const NO_CARRIER_CODE: &str = "Нет кода перевозчика";

/// Case-insensitive substring match; a blank query matches everything.
pub fn matches_query(title: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || title.to_lowercase().contains(&query.to_lowercase())
}

/// Settlements of one country, filtered by a text query.
pub struct CitySource<A> {
    api: A,
    country: CountryFilter,
}

impl<A> CitySource<A> {
    pub fn new(api: A, country: CountryFilter) -> Self {
        Self { api, country }
    }
}

impl<A: ScheduleApi + 'static> ListSource for CitySource<A> {
    type Row = String;
    type Criteria = String;

    async fn fetch(&self) -> Result<Vec<String>, RaspError> {
        let response = self.api.all_stations().await?;
        let cities = extract_cities(&response, &self.country);
        debug!(cities = cities.len(), "extracted cities");
        Ok(cities)
    }

    fn matches(&self, city: &String, query: &String) -> bool {
        matches_query(city, query)
    }

    fn empty_message(&self, query: &String) -> String {
        if query.trim().is_empty() {
            "Города не найдены".to_string()
        } else {
            "Город не найден".to_string()
        }
    }

    fn error_message(&self) -> String {
        GENERIC_ERROR.to_string()
    }
}

/// Stations of one city, filtered by a text query.
pub struct StationSource<A> {
    api: A,
    country: CountryFilter,
    city: String,
}

impl<A> StationSource<A> {
    pub fn new(api: A, country: CountryFilter, city: impl Into<String>) -> Self {
        Self {
            api,
            country,
            city: city.into(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

impl<A: ScheduleApi + 'static> ListSource for StationSource<A> {
    type Row = StationItem;
    type Criteria = String;

    async fn fetch(&self) -> Result<Vec<StationItem>, RaspError> {
        let response = self.api.all_stations().await?;
        let stations = extract_stations(&response, &self.country, &self.city);
        debug!(city = %self.city, stations = stations.len(), "extracted stations");
        Ok(stations)
    }

    fn matches(&self, station: &StationItem, query: &String) -> bool {
        matches_query(&station.title, query)
    }

    fn empty_message(&self, query: &String) -> String {
        if query.trim().is_empty() {
            "Станции не найдены".to_string()
        } else {
            "Станция не найдена".to_string()
        }
    }

    fn error_message(&self) -> String {
        "Не удалось загрузить список станций".to_string()
    }
}

/// Search results between two stations on one day.
pub struct SegmentSource<A> {
    api: A,
    query: SegmentQuery,
}

impl<A> SegmentSource<A> {
    pub fn new(api: A, query: SegmentQuery) -> Self {
        Self { api, query }
    }

    pub fn query(&self) -> &SegmentQuery {
        &self.query
    }
}

impl<A: ScheduleApi + 'static> ListSource for SegmentSource<A> {
    type Row = CarrierRow;
    type Criteria = FilterCriteria;

    async fn fetch(&self) -> Result<Vec<CarrierRow>, RaspError> {
        let response = self.api.search_segments(&self.query).await?;
        Ok(segments_to_rows(&response))
    }

    fn matches(&self, row: &CarrierRow, criteria: &FilterCriteria) -> bool {
        criteria.matches(row)
    }

    fn empty_message(&self, _criteria: &FilterCriteria) -> String {
        "Вариантов нет".to_string()
    }

    fn error_message(&self) -> String {
        GENERIC_ERROR.to_string()
    }
}

/// One carrier's profile. Yields exactly one row on success.
pub struct CarrierInfoSource<A> {
    api: A,
    code: String,
}

impl<A> CarrierInfoSource<A> {
    pub fn new(api: A, code: impl Into<String>) -> Self {
        Self {
            api,
            code: code.into(),
        }
    }
}

impl<A: ScheduleApi + 'static> ListSource for CarrierInfoSource<A> {
    type Row = CarrierDetails;
    type Criteria = ();

    async fn fetch(&self) -> Result<Vec<CarrierDetails>, RaspError> {
        let response = self.api.carrier_info(self.code.trim()).await?;
        Ok(vec![carrier_details(&response)])
    }

    fn matches(&self, _row: &CarrierDetails, _criteria: &()) -> bool {
        true
    }

    fn empty_message(&self, _criteria: &()) -> String {
        GENERIC_ERROR.to_string()
    }

    fn error_message(&self) -> String {
        GENERIC_ERROR.to_string()
    }

    fn rejection(&self) -> Option<String> {
        self.code
            .trim()
            .is_empty()
            .then(|| NO_CARRIER_CODE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matching() {
        assert!(matches_query("Санкт-Петербург", ""));
        assert!(matches_query("Санкт-Петербург", "   "));
        assert!(matches_query("Санкт-Петербург", "пе"));
        assert!(matches_query("Санкт-Петербург", " ПЕТЕР "));
        assert!(matches_query("Пермь", "пе"));
        assert!(!matches_query("Москва", "пе"));
    }

    #[test]
    fn latin_query_is_case_insensitive() {
        assert!(matches_query("Moscow", "mOs"));
    }
}
