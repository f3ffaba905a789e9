use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{
    model::IMAGE_BASE_URL,
    provider::{ProviderId, openweather, tmdb},
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Upstream base URLs; only worth changing when going through a proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub movie_base_url: String,
    pub weather_base_url: String,
    pub image_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            movie_base_url: tmdb::DEFAULT_BASE_URL.to_string(),
            weather_base_url: openweather::DEFAULT_BASE_URL.to_string(),
            image_base_url: IMAGE_BASE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound for one upstream request, in seconds.
    pub request_timeout_secs: u64,

    /// Rows per page in listings.
    pub page_size: u32,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    pub providers: HashMap<String, ProviderConfig>,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            providers: HashMap::new(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply
    /// `TMDB_API_KEY` / `WEATHER_API_KEY` from the environment.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from disk only, or return defaults if it doesn't exist yet.
    /// Use this before [`save`](Self::save) so environment keys are not persisted.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "catalog", "catalog-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overrides provider keys from `lookup` (the process environment in
    /// [`load`](Self::load)). Blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.env_var()).filter(|k| !k.trim().is_empty()) {
                self.upsert_provider_api_key(*id, key);
            }
        }
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        crate::provider::require_api_key(provider_id, self.provider_api_key(provider_id)).is_ok()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_apis() {
        let cfg = Config::default();

        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.endpoints.movie_base_url, "https://api.themoviedb.org/3");
        assert!(!cfg.is_provider_configured(ProviderId::Tmdb));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            request_timeout_secs = 3

            [providers.openweather]
            api_key = "OW_KEY"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.endpoints, Endpoints::default());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OW_KEY"));
    }

    #[test]
    fn toml_roundtrip_preserves_keys() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Tmdb, "TMDB_KEY".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();

        assert_eq!(back.provider_api_key(ProviderId::Tmdb), Some("TMDB_KEY"));
    }

    #[test]
    fn env_overrides_replace_file_keys() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FROM_FILE".into());

        cfg.apply_env_overrides(|name| match name {
            "WEATHER_API_KEY" => Some("FROM_ENV".into()),
            "TMDB_API_KEY" => Some("   ".into()),
            _ => None,
        });

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("FROM_ENV"));
        assert_eq!(cfg.provider_api_key(ProviderId::Tmdb), None);
    }

    #[test]
    fn placeholder_key_is_not_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(
            ProviderId::OpenWeather,
            "your_openweather_api_key_here".into(),
        );

        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cfg = Config { request_timeout_secs: 0, ..Config::default() };
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }
}
