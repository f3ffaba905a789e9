use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    CatalogError,
    error::Result,
    model::{Genre, Movie, MovieResponse, PaginationParams, SearchParams},
    provider::{MovieRepository, ProviderId, require_api_key},
};

use super::{null_as_default, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    pub fn new(http: Client, base_url: String, api_key: Option<String>) -> Self {
        Self { http, base_url, api_key }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let api_key = require_api_key(ProviderId::Tmdb, self.api_key.as_deref())?;
        let url = format!("{}{}", self.base_url, path);

        debug!("TMDB request - path={}", path);

        let res = self
            .http
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(query)
            .send()
            .await
            .map_err(|source| CatalogError::Http { provider: ProviderId::Tmdb, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| CatalogError::Http { provider: ProviderId::Tmdb, source })?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                provider: ProviderId::Tmdb,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|source| CatalogError::Decode { provider: ProviderId::Tmdb, source })
    }
}

#[async_trait]
impl MovieRepository for TmdbClient {
    async fn popular_movies(&self, params: PaginationParams) -> Result<MovieResponse> {
        let page: TmdbPage =
            self.get("/movie/popular", &[("page", params.page.to_string())]).await?;
        Ok(map_page(page))
    }

    async fn search_movies(
        &self,
        search: &SearchParams,
        params: PaginationParams,
    ) -> Result<MovieResponse> {
        let query = search.query.clone().unwrap_or_default();
        let page: TmdbPage = self
            .get("/search/movie", &[("page", params.page.to_string()), ("query", query)])
            .await?;
        Ok(map_page(page))
    }

    async fn movie_details(&self, id: u64) -> Result<Movie> {
        let movie: TmdbMovie = self.get(&format!("/movie/{id}"), &[]).await?;
        Ok(map_movie(movie))
    }
}

#[derive(Debug, Deserialize)]
struct TmdbPage {
    page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<TmdbMovie>,
    #[serde(default, deserialize_with = "null_as_default")]
    total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    vote_average: f64,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    genre_ids: Vec<u32>,
    /// Only the details endpoint sends full genre objects.
    #[serde(default, deserialize_with = "null_as_default")]
    genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    vote_count: u64,
}

fn map_page(page: TmdbPage) -> MovieResponse {
    MovieResponse {
        page: page.page,
        results: page.results.into_iter().map(map_movie).collect(),
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

fn map_movie(movie: TmdbMovie) -> Movie {
    let genre_ids = if movie.genre_ids.is_empty() {
        movie.genres.iter().map(|g| g.id).collect()
    } else {
        movie.genre_ids
    };

    Movie {
        id: movie.id,
        title: movie.title,
        overview: movie.overview,
        release_date: movie.release_date,
        rating: movie.vote_average,
        poster_path: movie.poster_path,
        backdrop_path: movie.backdrop_path,
        genre_ids,
        popularity: movie.popularity,
        vote_count: movie.vote_count,
    }
}
