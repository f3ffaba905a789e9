//! Tabbed listing state shared by every front-end.
//!
//! `Browser` owns the tab, page, search text and loading/error flags and
//! decides which use-case to call. Front-ends render `state()` and feed user
//! input back through the `on_*` methods.

use tracing::error;

use crate::{
    CatalogError,
    model::{Movie, PaginationParams, SearchParams, Weather},
    use_case::{MovieUseCase, WeatherUseCase},
};

const CITY_NOT_FOUND_HINT: &str =
    "Could not find that city. Try: Madrid, London, Tokyo, New York, etc.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Movies,
    Weather,
}

impl Tab {
    pub fn from_index(index: usize) -> Self {
        if index == 0 { Tab::Movies } else { Tab::Weather }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Movies => "Movies",
            Tab::Weather => "Weather",
        }
    }

    pub fn search_placeholder(&self) -> &'static str {
        match self {
            Tab::Movies => "Search movies...",
            Tab::Weather => "Search cities (e.g., Madrid, London, Tokyo, New York)...",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Tab::Movies => MOVIE_COLUMNS,
            Tab::Weather => WEATHER_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Image,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

const fn column(key: &'static str, label: &'static str, kind: ColumnKind) -> Column {
    Column { key, label, kind }
}

const MOVIE_COLUMNS: &[Column] = &[
    column("poster_path", "Poster", ColumnKind::Image),
    column("title", "Title", ColumnKind::Text),
    column("release_date", "Release Date", ColumnKind::Date),
    column("rating", "Rating", ColumnKind::Number),
    column("vote_count", "Votes", ColumnKind::Number),
];

const WEATHER_COLUMNS: &[Column] = &[
    column("city_name", "City", ColumnKind::Text),
    column("country", "Country", ColumnKind::Text),
    column("temperature", "Temperature (°C)", ColumnKind::Number),
    column("description", "Weather", ColumnKind::Text),
    column("humidity", "Humidity (%)", ColumnKind::Number),
    column("wind_speed", "Wind Speed (m/s)", ColumnKind::Number),
];

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    pub tab: Tab,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub query: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub movies: Vec<Movie>,
    pub weather: Vec<Weather>,
    pub movies_total: u64,
    pub weather_total: u64,
}

impl BrowserState {
    fn new(page_size: u32) -> Self {
        Self {
            tab: Tab::Movies,
            page: 1,
            page_size: page_size.max(1),
            query: String::new(),
            is_loading: false,
            error: None,
            movies: Vec::new(),
            weather: Vec::new(),
            movies_total: 0,
            weather_total: 0,
        }
    }

    pub fn total_results(&self) -> u64 {
        match self.tab {
            Tab::Movies => self.movies_total,
            Tab::Weather => self.weather_total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_results().div_ceil(u64::from(self.page_size)).max(1)
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug)]
pub struct Browser {
    movies: MovieUseCase,
    weather: WeatherUseCase,
    state: BrowserState,
}

impl Browser {
    pub fn new(movies: MovieUseCase, weather: WeatherUseCase, page_size: u32) -> Self {
        Self { movies, weather, state: BrowserState::new(page_size) }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Switching tabs clears the search, returns to page 1 and reloads.
    pub async fn on_tab_change(&mut self, tab: Tab) {
        self.state.tab = tab;
        self.state.query.clear();
        self.state.page = 1;
        self.state.error = None;
        self.load().await;
    }

    /// New search text always restarts from page 1. Unchanged text is a no-op.
    pub async fn on_search_change(&mut self, query: &str) {
        if self.state.query == query {
            return;
        }
        self.state.query = query.to_string();
        self.state.page = 1;
        self.load().await;
    }

    /// `page_index` is 0-based, as paginator widgets report it.
    pub async fn on_page_change(&mut self, page_index: u32, page_size: u32) {
        self.state.page = page_index.saturating_add(1);
        self.state.page_size = page_size.max(1);
        self.load().await;
    }

    pub async fn retry(&mut self) {
        self.state.error = None;
        self.load().await;
    }

    pub async fn load(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;

        match self.state.tab {
            Tab::Movies => self.load_movies().await,
            Tab::Weather => self.load_weather().await,
        }

        self.state.is_loading = false;
    }

    async fn load_movies(&mut self) {
        let params = PaginationParams { page: self.state.page, limit: self.state.page_size };

        let result = if self.state.query.trim().is_empty() {
            self.movies.popular_movies(params).await
        } else {
            self.movies.search_movies(&SearchParams::new(self.state.query.clone()), params).await
        };

        match result {
            Ok(response) => {
                self.state.movies = response.results;
                self.state.movies_total = response.total_results;
            }
            Err(e) => self.fail("Failed to load movies", &e),
        }
    }

    async fn load_weather(&mut self) {
        if self.state.query.trim().is_empty() {
            let result = self
                .weather
                .weather_for_cities_paginated(
                    self.state.page as usize,
                    self.state.page_size as usize,
                )
                .await;

            match result {
                Ok(response) => {
                    self.state.weather = response.weather;
                    self.state.weather_total = response.total_results as u64;
                }
                Err(e) => self.fail("Failed to load weather data", &e),
            }
        } else {
            let search = SearchParams::new(self.state.query.clone());
            match self.weather.search_weather_by_city(&search).await {
                Ok(weather) => {
                    self.state.weather = vec![weather];
                    self.state.weather_total = 1;
                }
                Err(e @ (CatalogError::CityNotFound(_) | CatalogError::EmptyQuery)) => {
                    self.fail(CITY_NOT_FOUND_HINT, &e)
                }
                Err(e) => self.fail(&format!("Failed to load weather for the city: {e}"), &e),
            }
        }
    }

    fn fail(&mut self, message: &str, err: &CatalogError) {
        error!("{} - {}", message, err);
        self.state.error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        CatalogError,
        model::{MovieResponse, WeatherResponse},
        provider::{MovieRepository, WeatherRepository},
        use_case::tests::{SpyMovies, SpyWeather},
    };

    fn browser() -> (Browser, Arc<SpyMovies>, Arc<SpyWeather>) {
        let movies = Arc::new(SpyMovies::default());
        let weather = Arc::new(SpyWeather::default());
        let browser = Browser::new(
            MovieUseCase::new(movies.clone()),
            WeatherUseCase::new(weather.clone()),
            10,
        );
        (browser, movies, weather)
    }

    fn calls(calls: &std::sync::Mutex<Vec<String>>) -> Vec<String> {
        calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn initial_load_fetches_popular_movies() {
        let (mut browser, movies, _) = browser();
        browser.load().await;

        assert_eq!(calls(&movies.calls), ["popular 1 10"]);
        assert!(!browser.state().is_loading);
        assert_eq!(browser.state().error, None);
    }

    #[tokio::test]
    async fn search_text_switches_to_search_and_resets_page() {
        let (mut browser, movies, _) = browser();
        browser.on_page_change(2, 10).await;
        browser.on_search_change("matrix").await;
        browser.on_search_change("matrix").await;

        assert_eq!(calls(&movies.calls), ["popular 3 10", "search \"matrix\" 1 10"]);
        assert_eq!(browser.state().page, 1);
    }

    #[tokio::test]
    async fn weather_tab_loads_paginated_and_clears_query() {
        let (mut browser, _, weather) = browser();
        browser.on_search_change("matrix").await;
        browser.on_tab_change(Tab::Weather).await;

        assert_eq!(calls(&weather.calls), ["paginated 1 10"]);
        assert_eq!(browser.state().query, "");
        assert_eq!(browser.state().total_results(), 40);
        assert_eq!(browser.state().total_pages(), 4);
        assert!(browser.state().has_next_page());
        assert!(!browser.state().has_prev_page());
    }

    #[tokio::test]
    async fn unknown_city_sets_hint_and_retry_reloads() {
        let (mut browser, _, weather) = browser();
        browser.on_tab_change(Tab::Weather).await;
        browser.on_search_change("Atlantis").await;

        assert_eq!(browser.state().error.as_deref(), Some(CITY_NOT_FOUND_HINT));

        browser.retry().await;
        assert_eq!(
            calls(&weather.calls),
            ["paginated 1 10", "search atlantis", "search atlantis"]
        );
        assert!(browser.state().error.is_some());
    }

    #[derive(Debug)]
    struct BrokenMovies;

    #[async_trait::async_trait]
    impl MovieRepository for BrokenMovies {
        async fn popular_movies(&self, _: PaginationParams) -> crate::Result<MovieResponse> {
            Err(CatalogError::EmptyQuery)
        }

        async fn search_movies(
            &self,
            _: &SearchParams,
            _: PaginationParams,
        ) -> crate::Result<MovieResponse> {
            Err(CatalogError::EmptyQuery)
        }

        async fn movie_details(&self, _: u64) -> crate::Result<Movie> {
            Err(CatalogError::EmptyQuery)
        }
    }

    #[derive(Debug)]
    struct OneCity;

    #[async_trait::async_trait]
    impl WeatherRepository for OneCity {
        async fn weather_for_cities(&self, _: &[String]) -> crate::Result<WeatherResponse> {
            unreachable!()
        }

        async fn weather_for_cities_paginated(
            &self,
            _: usize,
            _: usize,
        ) -> crate::Result<WeatherResponse> {
            Ok(WeatherResponse { weather: Vec::new(), total_results: 40 })
        }

        async fn search_weather_by_city(&self, search: &SearchParams) -> crate::Result<Weather> {
            Ok(Weather {
                id: 7,
                city_name: search.normalized(),
                country: "XX".into(),
                temperature: 20,
                feels_like: 20,
                humidity: 1,
                pressure: 1,
                description: None,
                icon: None,
                wind_speed: 0.0,
                wind_direction: 0,
                visibility: 0,
                cloudiness: 0,
            })
        }

        async fn current_weather(&self, _: &str) -> crate::Result<Weather> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn movie_failure_sets_error_message() {
        let mut browser = Browser::new(
            MovieUseCase::new(Arc::new(BrokenMovies)),
            WeatherUseCase::new(Arc::new(OneCity)),
            10,
        );
        browser.load().await;

        assert_eq!(browser.state().error.as_deref(), Some("Failed to load movies"));
        assert!(!browser.state().is_loading);
    }

    #[tokio::test]
    async fn weather_search_shows_single_row() {
        let mut browser = Browser::new(
            MovieUseCase::new(Arc::new(BrokenMovies)),
            WeatherUseCase::new(Arc::new(OneCity)),
            10,
        );
        browser.on_tab_change(Tab::Weather).await;
        browser.on_search_change("Lagos").await;

        assert_eq!(browser.state().weather.len(), 1);
        assert_eq!(browser.state().total_results(), 1);
        assert_eq!(browser.state().error, None);
    }

    #[test]
    fn columns_and_placeholders_follow_tab() {
        assert_eq!(Tab::from_index(0), Tab::Movies);
        assert_eq!(Tab::from_index(1), Tab::Weather);
        assert_eq!(Tab::Movies.columns()[1].key, "title");
        assert_eq!(Tab::Weather.columns().len(), 6);
        assert!(Tab::Weather.search_placeholder().contains("cities"));
    }
}
