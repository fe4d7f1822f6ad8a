use std::env;

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com";

const MIN_TMDB_KEY_LEN: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TMDB_API_KEY is not set")]
    MissingTmdbKey,
    #[error("invalid TMDB API key configuration")]
    InvalidTmdbKey,
    #[error("invalid TMDB base URL configuration: {0}")]
    InvalidTmdbBaseUrl(String),
}

/// Endpoints and credentials for the two metadata services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub poster_base_url: String,
    pub backdrop_base_url: String,
    /// Enrichment is skipped when unset.
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
}

impl ApiConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let or_default =
            |name: &str, default: &str| read(name).unwrap_or_else(|| default.to_string());

        let config = Self {
            tmdb_api_key: read("TMDB_API_KEY").ok_or(ConfigError::MissingTmdbKey)?,
            tmdb_base_url: trim_slash(or_default("TMDB_BASE_URL", DEFAULT_TMDB_BASE_URL)),
            poster_base_url: trim_slash(or_default("POSTER_BASE_URL", DEFAULT_POSTER_BASE_URL)),
            backdrop_base_url: trim_slash(or_default(
                "BACKDROP_BASE_URL",
                DEFAULT_BACKDROP_BASE_URL,
            )),
            omdb_api_key: read("OMDB_API_KEY"),
            omdb_base_url: trim_slash(or_default("OMDB_BASE_URL", DEFAULT_OMDB_BASE_URL)),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tmdb_api_key.len() < MIN_TMDB_KEY_LEN {
            return Err(ConfigError::InvalidTmdbKey);
        }
        if !self.tmdb_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidTmdbBaseUrl(self.tmdb_base_url.clone()));
        }
        Ok(())
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
