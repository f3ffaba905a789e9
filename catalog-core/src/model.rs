use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const PLACEHOLDER_IMAGE: &str = "/assets/no-image.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// 1-based page index.
    pub page: u32,
    pub limit: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: Some(query.into()) }
    }

    /// Lowercased, trimmed query; empty when absent.
    pub fn normalized(&self) -> String {
        self.query.as_deref().unwrap_or_default().trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub rating: f64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genre_ids: Vec<u32>,
    pub popularity: f64,
    pub vote_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub id: u64,
    pub city_name: String,
    pub country: String,
    /// Whole degrees Celsius.
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u32,
    pub pressure: u32,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Metres per second, one decimal place.
    pub wind_speed: f64,
    pub wind_direction: u32,
    pub visibility: u32,
    pub cloudiness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub weather: Vec<Weather>,
    pub total_results: usize,
}

/// Joins a relative image path onto `base`, or falls back to the local placeholder.
pub fn image_url(base: &str, path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{base}{p}"),
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// Renders a `YYYY-MM-DD` release date for display; anything unparsable becomes "N/A".
pub fn format_release_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_joins_base_and_path() {
        assert_eq!(
            image_url(IMAGE_BASE_URL, Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn missing_image_path_uses_placeholder() {
        assert_eq!(image_url(IMAGE_BASE_URL, None), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(IMAGE_BASE_URL, Some("")), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn release_date_formatting() {
        assert_eq!(format_release_date("2024-03-01"), "Mar 1, 2024");
        assert_eq!(format_release_date(""), "N/A");
        assert_eq!(format_release_date("soon"), "N/A");
    }

    #[test]
    fn search_params_normalize() {
        assert_eq!(SearchParams::new("  LonDon ").normalized(), "london");
        assert_eq!(SearchParams::default().normalized(), "");
    }
}
