use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    CatalogError,
    city::MockCity,
    error::Result,
    model::Weather,
    provider::{ConditionsSource, ProviderId, require_api_key},
};

use super::{null_as_default, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const NO_DESCRIPTION: &str = "No description available";

/// Current conditions by coordinates from OpenWeather.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(http: Client, base_url: String, api_key: Option<String>) -> Self {
        Self { http, base_url, api_key }
    }
}

#[async_trait]
impl ConditionsSource for OpenWeatherClient {
    async fn current_conditions(&self, city: &MockCity) -> Result<Weather> {
        let api_key = require_api_key(ProviderId::OpenWeather, self.api_key.as_deref())?;

        let (lat, lon) = (city.lat.to_string(), city.lon.to_string());

        debug!("OpenWeather request - city={}, lat={}, lon={}", city.name, lat, lon);

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|source| CatalogError::Http { provider: ProviderId::OpenWeather, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| CatalogError::Http { provider: ProviderId::OpenWeather, source })?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                provider: ProviderId::OpenWeather,
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|source| CatalogError::Decode { provider: ProviderId::OpenWeather, source })?;

        Ok(map_current(parsed, city))
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwCondition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    #[serde(default, deserialize_with = "null_as_default")]
    temp: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    feels_like: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    humidity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default, deserialize_with = "null_as_default")]
    speed: f64,
    deg: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    weather: Vec<OwCondition>,
    #[serde(default, deserialize_with = "null_as_default")]
    main: OwMain,
    #[serde(default, deserialize_with = "null_as_default")]
    wind: OwWind,
    #[serde(default, deserialize_with = "null_as_default")]
    clouds: OwClouds,
    #[serde(default, deserialize_with = "null_as_default")]
    sys: OwSys,
    visibility: Option<u32>,
}

fn map_current(response: OwCurrentResponse, city: &MockCity) -> Weather {
    let condition = response.weather.into_iter().next().unwrap_or_default();

    let city_name =
        if response.name.is_empty() { city.name.to_string() } else { response.name };
    let country = response
        .sys
        .country
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| city.country.to_string());

    Weather {
        id: response.id,
        city_name,
        country,
        temperature: round_half_up(response.main.temp) as i32,
        feels_like: round_half_up(response.main.feels_like) as i32,
        humidity: response.main.humidity,
        pressure: response.main.pressure,
        description: Some(
            condition
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        ),
        icon: condition.icon,
        wind_speed: round_half_up(response.wind.speed * 10.0) / 10.0,
        wind_direction: response.wind.deg.unwrap_or(0),
        visibility: response.visibility.unwrap_or(0),
        cloudiness: response.clouds.all.unwrap_or(0),
    }
}

/// Nearest integer, halves toward positive infinity (`-2.5` becomes `-2`).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityCatalog;

    fn madrid() -> MockCity {
        *CityCatalog::builtin().resolve("Madrid").unwrap()
    }

    #[test]
    fn maps_full_payload() {
        let json = r#"{
            "id": 3117735,
            "name": "Madrid",
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 21.6, "feels_like": 20.4, "humidity": 40, "pressure": 1017},
            "wind": {"speed": 3.44, "deg": 250},
            "clouds": {"all": 5},
            "sys": {"country": "ES"},
            "visibility": 10000
        }"#;
        let weather = map_current(serde_json::from_str(json).unwrap(), &madrid());

        assert_eq!(
            weather,
            Weather {
                id: 3117735,
                city_name: "Madrid".into(),
                country: "ES".into(),
                temperature: 22,
                feels_like: 20,
                humidity: 40,
                pressure: 1017,
                description: Some("clear sky".into()),
                icon: Some("01d".into()),
                wind_speed: 3.4,
                wind_direction: 250,
                visibility: 10000,
                cloudiness: 5,
            }
        );
    }

    #[test]
    fn missing_optionals_degrade_to_defaults() {
        let json = r#"{
            "id": 1,
            "name": "",
            "weather": [{"icon": "04n"}],
            "main": {"temp": 10.2, "feels_like": 9.5, "humidity": 80, "pressure": 1000},
            "wind": {"speed": 1.0},
            "clouds": {},
            "sys": {}
        }"#;
        let weather = map_current(serde_json::from_str(json).unwrap(), &madrid());

        assert_eq!(weather.description.as_deref(), Some(NO_DESCRIPTION));
        assert_eq!(weather.wind_direction, 0);
        assert_eq!(weather.visibility, 0);
        assert_eq!(weather.cloudiness, 0);
        assert_eq!(weather.city_name, "Madrid");
        assert_eq!(weather.country, "ES");
        assert_eq!(weather.feels_like, 10);
    }

    #[test]
    fn empty_weather_array_and_missing_objects() {
        let json = r#"{"id": 2, "name": "Oslo", "weather": []}"#;
        let weather = map_current(serde_json::from_str(json).unwrap(), &madrid());

        assert_eq!(weather.description.as_deref(), Some(NO_DESCRIPTION));
        assert_eq!(weather.icon, None);
        assert_eq!(weather.wind_speed, 0.0);
        assert_eq!(weather.temperature, 0);
    }

    #[test]
    fn null_objects_degrade_to_defaults() {
        let json = r#"{
            "id": 3,
            "name": null,
            "weather": null,
            "main": {"temp": 4.5, "feels_like": null, "humidity": null, "pressure": 990},
            "wind": null,
            "clouds": null,
            "sys": null,
            "visibility": null
        }"#;
        let weather = map_current(serde_json::from_str(json).unwrap(), &madrid());

        assert_eq!(weather.city_name, "Madrid");
        assert_eq!(weather.country, "ES");
        assert_eq!(weather.temperature, 5);
        assert_eq!(weather.feels_like, 0);
        assert_eq!(weather.humidity, 0);
        assert_eq!(weather.pressure, 990);
        assert_eq!(weather.description.as_deref(), Some(NO_DESCRIPTION));
        assert_eq!(weather.wind_speed, 0.0);
        assert_eq!(weather.wind_direction, 0);
        assert_eq!(weather.cloudiness, 0);
        assert_eq!(weather.visibility, 0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_half_up(21.6), 22.0);
        assert_eq!(round_half_up(21.5), 22.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(3.44 * 10.0) / 10.0, 3.4);
    }

    #[tokio::test]
    async fn placeholder_key_fails_before_request() {
        let client = OpenWeatherClient::new(
            Client::new(),
            "http://127.0.0.1:9".into(),
            Some("your_openweather_api_key_here".into()),
        );
        let err = client.current_conditions(&madrid()).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingCredentials { provider: ProviderId::OpenWeather, .. }
        ));
    }
}
