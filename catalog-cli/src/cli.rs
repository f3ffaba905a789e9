use anyhow::Context;
use catalog_core::{
    CatalogError, CityCatalog, Config, MovieUseCase, PaginationParams, ProviderId, Repositories,
    SearchParams, WeatherUseCase,
};
use clap::{Parser, Subcommand};
use inquire::Password;
use tracing::debug;

use crate::{browse, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about = "Browse popular movies and city weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "tmdb" or "openweather".
        provider: String,
    },

    /// List popular movies, or search them when --query is given.
    Movies {
        #[arg(long, short)]
        query: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page; defaults to the configured page size.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one movie by its TMDB id.
    Movie { id: u64 },

    /// Weather for the given cities, a page of the city list, or the default set.
    Weather {
        /// City name; repeat for several cities.
        #[arg(long = "city")]
        cities: Vec<String>,

        /// Page of the full city list (1-based).
        #[arg(long, conflicts_with = "cities")]
        page: Option<usize>,

        #[arg(long, requires = "page")]
        page_size: Option<usize>,
    },

    /// Search weather by a free-text city name.
    Search { city: String },

    /// Current weather for one city.
    Current { city: String },

    /// List the supported cities, optionally filtered.
    Cities { query: Option<String> },

    /// Show the city a name resolves to, with its coordinates.
    City { name: String },

    /// Interactive browser with movie and weather tabs.
    Browse,
}

/// Config plus the use-cases built from it; only commands that reach a provider need it.
struct Session {
    config: Config,
    movies: MovieUseCase,
    weather: WeatherUseCase,
}

impl Session {
    fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;
        debug!(
            "Config loaded - tmdb={}, openweather={}, timeout={:?}",
            config.is_provider_configured(ProviderId::Tmdb),
            config.is_provider_configured(ProviderId::OpenWeather),
            config.request_timeout()
        );

        let repos = Repositories::from_config(&config, CityCatalog::builtin())?;
        Ok(Self {
            movies: MovieUseCase::new(repos.movies),
            weather: WeatherUseCase::new(repos.weather),
            config,
        })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider)?,
            Command::Cities { query } => {
                let query = query.unwrap_or_default();
                render::cities(&CityCatalog::builtin().search(&query));
            }
            Command::City { name } => {
                let catalog = CityCatalog::builtin();
                let city = catalog.city_info(&name).ok_or(CatalogError::CityNotFound(name))?;
                render::city(city);
            }
            Command::Movies { query, page, limit } => {
                let session = Session::open()?;
                let params =
                    PaginationParams { page, limit: limit.unwrap_or(session.config.page_size) };
                let response = match query.filter(|q| !q.trim().is_empty()) {
                    Some(q) => session.movies.search_movies(&SearchParams::new(q), params).await?,
                    None => session.movies.popular_movies(params).await?,
                };
                render::movie_page(&response);
            }
            Command::Movie { id } => {
                let session = Session::open()?;
                let movie = session.movies.movie_details(id).await?;
                render::movie_details(&movie, &session.config.endpoints.image_base_url);
            }
            Command::Weather { cities, page, page_size } => {
                let session = Session::open()?;
                let response = match page {
                    Some(page) => {
                        let size = page_size.unwrap_or(session.config.page_size as usize);
                        session.weather.weather_for_cities_paginated(page, size).await?
                    }
                    None => session.weather.weather_for_cities(&cities).await?,
                };
                render::weather_table(&response.weather, response.total_results as u64);
            }
            Command::Search { city } => {
                let session = Session::open()?;
                let search = SearchParams::new(city);
                let reading = session.weather.search_weather_by_city(&search).await?;
                render::weather_details(&reading);
            }
            Command::Current { city } => {
                let session = Session::open()?;
                let reading = session.weather.current_weather(&city).await?;
                render::weather_details(&reading);
            }
            Command::Browse => {
                let session = Session::open()?;
                browse::run(session.movies, session.weather, &session.config).await?;
            }
        }

        Ok(())
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load_file()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    if !config.is_provider_configured(id) {
        anyhow::bail!("That does not look like a real {id} API key; nothing was saved.");
    }
    config.save()?;

    println!("Saved {id} API key to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_accepts_repeated_cities() {
        let cli = Cli::try_parse_from(["catalog", "weather", "--city", "Madrid", "--city", "Oslo"])
            .unwrap();
        match cli.command {
            Command::Weather { cities, page, .. } => {
                assert_eq!(cities, ["Madrid", "Oslo"]);
                assert_eq!(page, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn page_and_cities_conflict() {
        assert!(
            Cli::try_parse_from(["catalog", "weather", "--city", "Madrid", "--page", "2"]).is_err()
        );
    }

    #[test]
    fn page_size_requires_page() {
        assert!(Cli::try_parse_from(["catalog", "weather", "--page-size", "5"]).is_err());
    }

    #[test]
    fn city_takes_a_name() {
        let cli = Cli::try_parse_from(["catalog", "city", "new york"]).unwrap();
        match cli.command {
            Command::City { name } => assert_eq!(name, "new york"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_city_is_reported_without_config() {
        let cli = Cli::try_parse_from(["catalog", "city", "Atlantis"]).unwrap();
        let err = cli.run().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::CityNotFound(name)) if name == "Atlantis"
        ));
    }

    #[test]
    fn movies_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["catalog", "movies", "-q", "alien"]).unwrap();
        match cli.command {
            Command::Movies { query, page, limit } => {
                assert_eq!(query.as_deref(), Some("alien"));
                assert_eq!(page, 1);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
