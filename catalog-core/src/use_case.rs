//! Entry points for the presentation layer. Each call forwards to the
//! repository it was built with.

use std::sync::Arc;

use crate::{
    error::Result,
    model::{Movie, MovieResponse, PaginationParams, SearchParams, Weather, WeatherResponse},
    provider::{MovieRepository, WeatherRepository},
};

#[derive(Debug, Clone)]
pub struct MovieUseCase {
    repository: Arc<dyn MovieRepository>,
}

impl MovieUseCase {
    pub fn new(repository: Arc<dyn MovieRepository>) -> Self {
        Self { repository }
    }

    pub async fn popular_movies(&self, params: PaginationParams) -> Result<MovieResponse> {
        self.repository.popular_movies(params).await
    }

    pub async fn search_movies(
        &self,
        search: &SearchParams,
        params: PaginationParams,
    ) -> Result<MovieResponse> {
        self.repository.search_movies(search, params).await
    }

    pub async fn movie_details(&self, id: u64) -> Result<Movie> {
        self.repository.movie_details(id).await
    }
}

#[derive(Debug, Clone)]
pub struct WeatherUseCase {
    repository: Arc<dyn WeatherRepository>,
}

impl WeatherUseCase {
    pub fn new(repository: Arc<dyn WeatherRepository>) -> Self {
        Self { repository }
    }

    pub async fn weather_for_cities(&self, cities: &[String]) -> Result<WeatherResponse> {
        self.repository.weather_for_cities(cities).await
    }

    pub async fn weather_for_cities_paginated(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<WeatherResponse> {
        self.repository.weather_for_cities_paginated(page, page_size).await
    }

    pub async fn search_weather_by_city(&self, search: &SearchParams) -> Result<Weather> {
        self.repository.search_weather_by_city(search).await
    }

    pub async fn current_weather(&self, city_name: &str) -> Result<Weather> {
        self.repository.current_weather(city_name).await
    }
}
