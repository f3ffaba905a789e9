//! Core library for the `catalog` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Repository contracts and their TMDB / OpenWeather adapters
//! - City resolution and concurrent weather fan-out
//! - Use-cases and the tabbed browsing state the front-end drives
//!
//! It is used by `catalog-cli`, but can also be reused by other binaries or services.

pub mod browser;
pub mod city;
pub mod config;
pub mod error;
pub mod fanout;
pub mod model;
pub mod provider;
pub mod use_case;

pub use browser::{Browser, BrowserState, Tab};
pub use city::{CityCatalog, MockCity};
pub use config::{Config, Endpoints, ProviderConfig};
pub use error::{CatalogError, Result};
pub use model::{Movie, MovieResponse, PaginationParams, SearchParams, Weather, WeatherResponse};
pub use provider::{MovieRepository, ProviderId, Repositories, WeatherRepository};
pub use use_case::{MovieUseCase, WeatherUseCase};
