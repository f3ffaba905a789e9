//! Static city reference data and free-text resolution.
//!
//! The weather API is queried by coordinates, so every weather lookup first
//! resolves a name to one of these records. Matching is plain substring
//! matching in list order; an ambiguous query lands on whichever city comes
//! first in the list.

use std::sync::Arc;

use serde::Serialize;

/// How many cities the "all cities" view fetches when no names are given.
pub const DEFAULT_CITY_LIMIT: usize = 12;

/// Upper bound on [`CityCatalog::search`] results.
pub const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MockCity {
    pub name: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn city(name: &'static str, country: &'static str, lat: f64, lon: f64) -> MockCity {
    MockCity { name, country, lat, lon }
}

pub const BUILTIN_CITIES: [MockCity; 40] = [
    city("Madrid", "ES", 40.4168, -3.7038),
    city("Barcelona", "ES", 41.3851, 2.1734),
    city("London", "GB", 51.5074, -0.1278),
    city("Paris", "FR", 48.8566, 2.3522),
    city("Berlin", "DE", 52.5200, 13.4050),
    city("Rome", "IT", 41.9028, 12.4964),
    city("Amsterdam", "NL", 52.3676, 4.9041),
    city("Vienna", "AT", 48.2082, 16.3738),
    city("Prague", "CZ", 50.0755, 14.4378),
    city("Warsaw", "PL", 52.2297, 21.0122),
    city("Stockholm", "SE", 59.3293, 18.0686),
    city("Oslo", "NO", 59.9139, 10.7522),
    city("Copenhagen", "DK", 55.6761, 12.5683),
    city("Helsinki", "FI", 60.1699, 24.9384),
    city("Lisbon", "PT", 38.7223, -9.1393),
    city("Dublin", "IE", 53.3498, -6.2603),
    city("Brussels", "BE", 50.8503, 4.3517),
    city("Zurich", "CH", 47.3769, 8.5417),
    city("Luxembourg", "LU", 49.6117, 6.1319),
    city("Monaco", "MC", 43.7384, 7.4246),
    city("New York", "US", 40.7128, -74.0060),
    city("Los Angeles", "US", 34.0522, -118.2437),
    city("Chicago", "US", 41.8781, -87.6298),
    city("Miami", "US", 25.7617, -80.1918),
    city("Toronto", "CA", 43.6532, -79.3832),
    city("Vancouver", "CA", 49.2827, -123.1207),
    city("Tokyo", "JP", 35.6762, 139.6503),
    city("Seoul", "KR", 37.5665, 126.9780),
    city("Beijing", "CN", 39.9042, 116.4074),
    city("Shanghai", "CN", 31.2304, 121.4737),
    city("Mumbai", "IN", 19.0760, 72.8777),
    city("Delhi", "IN", 28.7041, 77.1025),
    city("Sydney", "AU", -33.8688, 151.2093),
    city("Melbourne", "AU", -37.8136, 144.9631),
    city("São Paulo", "BR", -23.5558, -46.6396),
    city("Rio de Janeiro", "BR", -22.9068, -43.1729),
    city("Buenos Aires", "AR", -34.6118, -58.3960),
    city("Mexico City", "MX", 19.4326, -99.1332),
    city("Lagos", "NG", 6.5244, 3.3792),
    city("Cairo", "EG", 30.0444, 31.2357),
];

/// Read-only city list shared by the weather repository and the CLI.
///
/// Cloning is cheap; all clones share the same backing slice.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Arc<[MockCity]>,
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CityCatalog {
    pub fn builtin() -> Self {
        Self::new(BUILTIN_CITIES.to_vec())
    }

    pub fn new(cities: Vec<MockCity>) -> Self {
        Self { cities: cities.into() }
    }

    pub fn cities(&self) -> &[MockCity] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Every city name in list order.
    pub fn default_city_names(&self) -> Vec<String> {
        self.cities.iter().map(|c| c.name.to_string()).collect()
    }

    /// Resolves free text to a city: exact name first, then the first
    /// substring or country-code hit in list order.
    pub fn resolve(&self, query: &str) -> Option<&MockCity> {
        let needle = query.trim().to_lowercase();

        if let Some(exact) = self.cities.iter().find(|c| c.name.to_lowercase() == needle) {
            return Some(exact);
        }

        self.cities.iter().find(|c| {
            let name = c.name.to_lowercase();
            let country = c.country.to_lowercase();
            name.contains(&needle)
                || needle.contains(&name)
                || country == needle
                || country.contains(&needle)
        })
    }

    /// Same lookup as [`resolve`](Self::resolve), named for callers that only
    /// want to inspect a city.
    pub fn city_info(&self, name: &str) -> Option<&MockCity> {
        self.resolve(name)
    }

    /// `"Name, CC"` labels, sorted, for autocompletion.
    pub fn available_cities(&self) -> Vec<String> {
        let mut labels: Vec<String> =
            self.cities.iter().map(|c| format!("{}, {}", c.name, c.country)).collect();
        labels.sort();
        labels
    }

    /// Filters cities by name, country or `"name, cc"` substring. An empty
    /// query returns the head of the list.
    pub fn search(&self, query: &str) -> Vec<MockCity> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.cities.iter().take(SEARCH_LIMIT).copied().collect();
        }

        self.cities
            .iter()
            .filter(|c| {
                let name = c.name.to_lowercase();
                let country = c.country.to_lowercase();
                name.contains(&needle)
                    || country.contains(&needle)
                    || format!("{name}, {country}").contains(&needle)
            })
            .take(SEARCH_LIMIT)
            .copied()
            .collect()
    }
}
