//! Movie catalog client (TMDB v3)
//!
//! [`Catalog`] is the seam controllers depend on: one required `fetch` that
//! returns the raw JSON body, plus typed helpers layered on top of it.
//! [`CatalogClient`] is the HTTP implementation.
//! API docs: https://developer.themoviedb.org/docs

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Category, MovieDetail, MovieList, MovieSummary};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Catalog request failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// No response was received
    #[error("Request failed: {0}")]
    Transport(String),

    /// A response arrived but the body was not what we expected
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Non-2xx status
    #[error("HTTP error ({status})")]
    Http { status: u16 },
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Transport(err.to_string())
    }
}

/// Query parameters, appended to the URL in order
pub type Params<'a> = [(&'a str, &'a str)];

/// Read-only access to the remote movie catalog.
///
/// Implementors only provide [`Catalog::fetch`]. Nothing here retries.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// GET `path` (relative to the API root) with the given query parameters
    async fn fetch(&self, path: &str, params: &Params<'_>) -> Result<Value, NetworkError>;

    /// Any endpoint answering with a `results` envelope of movies
    async fn list(&self, path: &str, params: &Params<'_>) -> Result<Vec<MovieSummary>, NetworkError> {
        let body = self.fetch(path, params).await?;
        let page: ListResponse = decode(body)?;
        Ok(page.into_movies())
    }

    /// One of the home-screen feeds
    async fn movie_list(&self, list: MovieList) -> Result<Vec<MovieSummary>, NetworkError> {
        self.list(list.path(), &[]).await
    }

    /// Keyword search over movie titles
    async fn search(&self, keyword: &str) -> Result<Vec<MovieSummary>, NetworkError> {
        self.list("search/movie", &[("query", keyword)]).await
    }

    /// Movies in a genre
    async fn discover(&self, genre_id: u64) -> Result<Vec<MovieSummary>, NetworkError> {
        let genre = genre_id.to_string();
        self.list("discover/movie", &[("with_genres", genre.as_str())])
            .await
    }

    async fn movie_detail(&self, id: u64) -> Result<MovieDetail, NetworkError> {
        let body = self.fetch(&format!("movie/{}", id), &[]).await?;
        let raw: DetailResponse = decode(body)?;
        Ok(raw.into_detail())
    }

    async fn recommendations(&self, id: u64) -> Result<Vec<MovieSummary>, NetworkError> {
        self.list(&format!("movie/{}/recommendations", id), &[])
            .await
    }

    /// Full genre list
    async fn genres(&self) -> Result<Vec<Category>, NetworkError> {
        let body = self.fetch("genre/movie/list", &[]).await?;
        let response: GenresResponse = decode(body)?;
        Ok(response.genres)
    }
}

/// HTTP catalog client
pub struct CatalogClient {
    access_token: String,
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client for the public API with the given bearer token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Bound every request by `timeout`. Without this, requests never time out.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, NetworkError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with percent-encoded parameters in the given order
    pub fn endpoint_url(&self, path: &str, params: &Params<'_>) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch(&self, path: &str, params: &Params<'_>) -> Result<Value, NetworkError> {
        let url = self.endpoint_url(path, params);
        tracing::debug!(%url, "catalog request");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| NetworkError::Decode(format!("JSON parse error: {}", e)))
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, NetworkError> {
    serde_json::from_value(body).map_err(|e| NetworkError::Decode(e.to_string()))
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<MovieRaw>,
}

impl ListResponse {
    fn into_movies(self) -> Vec<MovieSummary> {
        self.results.into_iter().map(MovieRaw::into_summary).collect()
    }
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
}

impl MovieRaw {
    fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    overview: Option<String>,
    original_language: Option<String>,
    release_date: Option<String>,
    popularity: Option<f64>,
    vote_count: Option<u32>,
}

impl DetailResponse {
    fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id,
            title: self.title.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average.unwrap_or(0.0),
            overview: self.overview.unwrap_or_default(),
            original_language: self.original_language.unwrap_or_default(),
            release_date: self.release_date.as_deref().and_then(parse_date),
            popularity: self.popularity.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenresResponse {
    genres: Vec<Category>,
}

/// Parse a "YYYY-MM-DD" release date; unreleased titles carry ""
fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
