//! City resolution and concurrent weather fan-out.
//!
//! Batch operations resolve every name, fetch all resolvable cities at once
//! and keep only the readings that arrived. Single lookups propagate every
//! failure to the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::{
    CatalogError,
    city::{CityCatalog, DEFAULT_CITY_LIMIT, MockCity},
    error::Result,
    model::{SearchParams, Weather, WeatherResponse},
    provider::{ConditionsSource, WeatherRepository},
};

/// [`WeatherRepository`] over a fixed city list and a coordinate-based source.
#[derive(Debug)]
pub struct CityWeatherRepository<S> {
    cities: CityCatalog,
    source: S,
    fetch_timeout: Duration,
}

impl<S: ConditionsSource> CityWeatherRepository<S> {
    pub fn new(cities: CityCatalog, source: S, fetch_timeout: Duration) -> Self {
        Self { cities, source, fetch_timeout }
    }

    /// One slot per name, in input order. A slot is `None` when the name did
    /// not resolve, the fetch failed, or it ran past the timeout.
    async fn fan_out(&self, names: &[String]) -> Vec<Option<Weather>> {
        let started = Instant::now();

        let tasks = names.iter().map(|name| async move {
            let city = match self.cities.resolve(name) {
                Some(city) => city,
                None => {
                    warn!("Dropping unresolved city - query={:?}", name);
                    return None;
                }
            };
            self.fetch_bounded(city)
                .await
                .map_err(|e| warn!("Dropping city - city={}, error={}", city.name, e))
                .ok()
        });

        let slots = join_all(tasks).await;

        info!(
            "Weather fan-out completed - requested={}, succeeded={}, duration={:.2}s",
            names.len(),
            slots.iter().flatten().count(),
            started.elapsed().as_secs_f32()
        );

        slots
    }

    async fn fetch_bounded(&self, city: &MockCity) -> Result<Weather> {
        tokio::time::timeout(self.fetch_timeout, self.source.current_conditions(city))
            .await
            .map_err(|_| CatalogError::Timeout(self.fetch_timeout))?
    }

    async fn lookup(&self, query: &str) -> Result<Weather> {
        let city =
            self.cities.resolve(query).ok_or_else(|| CatalogError::CityNotFound(query.into()))?;
        self.source.current_conditions(city).await
    }
}

#[async_trait]
impl<S: ConditionsSource> WeatherRepository for CityWeatherRepository<S> {
    async fn weather_for_cities(&self, cities: &[String]) -> Result<WeatherResponse> {
        let names = if cities.is_empty() {
            self.cities.default_city_names().into_iter().take(DEFAULT_CITY_LIMIT).collect()
        } else {
            cities.to_vec()
        };

        let weather: Vec<Weather> = self.fan_out(&names).await.into_iter().flatten().collect();
        let total_results = weather.len();

        Ok(WeatherResponse { weather, total_results })
    }

    async fn weather_for_cities_paginated(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<WeatherResponse> {
        let all = self.cities.default_city_names();
        let total_results = all.len();

        let start = page.saturating_sub(1).saturating_mul(page_size);
        let page_names: &[String] = if page == 0 || start >= all.len() {
            &[]
        } else {
            &all[start..all.len().min(start.saturating_add(page_size))]
        };

        if page_names.is_empty() {
            return Ok(WeatherResponse { weather: Vec::new(), total_results });
        }

        let weather = self.fan_out(page_names).await.into_iter().flatten().collect();

        Ok(WeatherResponse { weather, total_results })
    }

    async fn search_weather_by_city(&self, search: &SearchParams) -> Result<Weather> {
        let query = search.normalized();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }
        self.lookup(&query).await
    }

    async fn current_weather(&self, city_name: &str) -> Result<Weather> {
        self.lookup(city_name).await
    }
}
