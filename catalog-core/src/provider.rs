use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    CatalogError, Config,
    city::{CityCatalog, MockCity},
    error::Result,
    fanout::CityWeatherRepository,
    model::{Movie, MovieResponse, PaginationParams, SearchParams, Weather, WeatherResponse},
    provider::{openweather::OpenWeatherClient, tmdb::TmdbClient},
};

pub mod openweather;
pub mod tmdb;

/// Key values shipped in sample `.env` files; treated as "not configured".
const PLACEHOLDER_KEYS: &[&str] = &["your_openweather_api_key_here", "your_tmdb_api_key_here"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Tmdb,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Tmdb => "tmdb",
            ProviderId::OpenWeather => "openweather",
        }
    }

    /// Environment variable that overrides the configured key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::Tmdb => "TMDB_API_KEY",
            ProviderId::OpenWeather => "WEATHER_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Tmdb, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "tmdb" | "moviedb" => Ok(ProviderId::Tmdb),
            "openweather" | "weather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: tmdb, openweather."
            )),
        }
    }
}

/// Returns the key if it is usable, or the configuration error to surface
/// before any request goes out.
pub fn require_api_key(id: ProviderId, api_key: Option<&str>) -> Result<&str> {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key) => Ok(key),
        _ => Err(CatalogError::MissingCredentials { provider: id, env_var: id.env_var() }),
    }
}

/// Caps an upstream error body so it stays readable in one log line.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Field deserializer that reads an explicit `null` as the type's default.
/// Pair with `#[serde(default)]` so absent keys behave the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[async_trait]
pub trait MovieRepository: Send + Sync + Debug {
    async fn popular_movies(&self, params: PaginationParams) -> Result<MovieResponse>;

    async fn search_movies(
        &self,
        search: &SearchParams,
        params: PaginationParams,
    ) -> Result<MovieResponse>;

    async fn movie_details(&self, id: u64) -> Result<Movie>;
}

#[async_trait]
pub trait WeatherRepository: Send + Sync + Debug {
    /// Fan-out over `cities`; an empty slice means the default city set.
    /// Unresolvable or failing cities are dropped, never reported.
    async fn weather_for_cities(&self, cities: &[String]) -> Result<WeatherResponse>;

    async fn weather_for_cities_paginated(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<WeatherResponse>;

    async fn search_weather_by_city(&self, search: &SearchParams) -> Result<Weather>;

    async fn current_weather(&self, city_name: &str) -> Result<Weather>;
}

/// Current conditions for an already-resolved city.
#[async_trait]
pub trait ConditionsSource: Send + Sync + Debug {
    async fn current_conditions(&self, city: &MockCity) -> Result<Weather>;
}

/// Repositories chosen at wiring time.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub movies: Arc<dyn MovieRepository>,
    pub weather: Arc<dyn WeatherRepository>,
}

impl Repositories {
    /// Wires the remote adapters. Missing keys are not an error here; each
    /// request checks its key before going out.
    pub fn from_config(config: &Config, cities: CityCatalog) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let movies = TmdbClient::new(
            http.clone(),
            config.endpoints.movie_base_url.clone(),
            config.provider_api_key(ProviderId::Tmdb).map(str::to_owned),
        );

        let conditions = OpenWeatherClient::new(
            http,
            config.endpoints.weather_base_url.clone(),
            config.provider_api_key(ProviderId::OpenWeather).map(str::to_owned),
        );

        let weather = CityWeatherRepository::new(cities, conditions, config.request_timeout());

        Ok(Self { movies: Arc::new(movies), weather: Arc::new(weather) })
    }
}
