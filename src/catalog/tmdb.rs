use std::fmt;

use serde::Deserialize;
use tracing::info;

use super::{CatalogError, MovieDetails, MovieSummary, Page, Video, decode};
use crate::http::{RetryPolicy, get_text_with_retries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    fn as_path(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

/// Client for the movie catalog service.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    policy: RetryPolicy,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            policy: RetryPolicy::default(),
        }
    }

    #[cfg(test)]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        let raw = self.get(
            &format!("movie/{id}"),
            &[("append_to_response", "credits".to_string())],
        )?;
        decode(&raw, "movie details")
    }

    pub fn search(&self, query: &str, page: u32) -> Result<Page<MovieSummary>, CatalogError> {
        let raw = self.get(
            "search/movie",
            &[
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
                ("include_adult", "false".to_string()),
            ],
        )?;
        decode(&raw, "search results")
    }

    pub fn trending(&self, window: TimeWindow) -> Result<Page<MovieSummary>, CatalogError> {
        let raw = self.get(&format!("trending/movie/{}", window.as_path()), &[])?;
        decode(&raw, "trending movies")
    }

    pub fn popular(&self, page: u32) -> Result<Page<MovieSummary>, CatalogError> {
        let raw = self.get("movie/popular", &[("page", page.max(1).to_string())])?;
        decode(&raw, "popular movies")
    }

    pub fn discover_by_genre(&self, genre_id: u32) -> Result<Page<MovieSummary>, CatalogError> {
        let raw = self.get(
            "discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("page", "1".to_string()),
            ],
        )?;
        decode(&raw, "genre listing")
    }

    pub fn videos(&self, id: u64) -> Result<Vec<Video>, CatalogError> {
        let raw = self.get(&format!("movie/{id}/videos"), &[])?;
        decode::<VideoList>(&raw, "videos").map(|list| list.results)
    }

    pub fn similar(&self, id: u64) -> Result<Page<MovieSummary>, CatalogError> {
        let raw = self.get(
            &format!("movie/{id}/similar"),
            &[("page", "1".to_string())],
        )?;
        decode(&raw, "similar movies")
    }

    fn get(&self, path: &str, extra: &[(&str, String)]) -> Result<String, CatalogError> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let mut query = vec![
            ("api_key".to_string(), self.api_key.clone()),
            ("language".to_string(), "en-US".to_string()),
        ];
        query.extend(
            extra
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone())),
        );

        info!(path, "catalog request");
        Ok(get_text_with_retries(&url, &query, &self.policy)?)
    }
}
