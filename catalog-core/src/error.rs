use std::time::Duration;

use thiserror::Error;

use crate::provider::ProviderId;

/// Failures surfaced by repositories and adapters.
///
/// Batch fan-out never returns these per city; they only reach callers of
/// single-item operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("City not specified")]
    EmptyQuery,

    #[error("City \"{0}\" was not found in the list of available cities")]
    CityNotFound(String),

    #[error(
        "No API key configured for provider '{provider}'.\n\
         Hint: run `catalog configure {provider}` or set {env_var}."
    )]
    MissingCredentials { provider: ProviderId, env_var: &'static str },

    #[error("{provider} request failed: {source}")]
    Http {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status { provider: ProviderId, status: reqwest::StatusCode, body: String },

    #[error("Failed to parse {provider} JSON: {source}")]
    Decode {
        provider: ProviderId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_query() {
        let err = CatalogError::CityNotFound("atlantis".into());
        assert!(err.to_string().contains("\"atlantis\""));
    }

    #[test]
    fn missing_credentials_mentions_configure_hint() {
        let err = CatalogError::MissingCredentials {
            provider: ProviderId::OpenWeather,
            env_var: ProviderId::OpenWeather.env_var(),
        };
        let msg = err.to_string();
        assert!(msg.contains("openweather"));
        assert!(msg.contains("catalog configure openweather"));
        assert!(msg.contains("WEATHER_API_KEY"));
    }
}
