mod omdb;
mod report;
mod tmdb;


use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::http::HttpError;
use crate::store::MovieCandidate;

pub use self::omdb::{Enrichment, OmdbClient, OmdbLookup};
pub use self::report::{MovieReport, build_report};
pub use self::tmdb::{TimeWindow, TmdbClient};

/// Genres offered on the home screen, in display order.
pub const HOME_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (35, "Comedy"),
    (18, "Drama"),
    (27, "Horror"),
    (10749, "Romance"),
    (878, "Sci-Fi"),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,
    #[error("The requested resource was not found.")]
    NotFound,
    #[error(transparent)]
    Http(HttpError),
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<HttpError> for CatalogError {
    fn from(err: HttpError) -> Self {
        match err.status() {
            Some(401) => Self::Unauthorized,
            Some(404) => Self::NotFound,
            _ => Self::Http(err),
        }
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    raw: &str,
    what: &'static str,
) -> Result<T, CatalogError> {
    serde_json::from_str(raw).map_err(|source| CatalogError::Decode { what, source })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tagline: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

impl MovieDetails {
    pub fn cast(&self) -> &[CastMember] {
        self.credits
            .as_ref()
            .map(|credits| credits.cast.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

impl From<&MovieSummary> for MovieCandidate {
    fn from(movie: &MovieSummary) -> Self {
        Self {
            id: Some(movie.id),
            title: Some(movie.title.clone()),
            poster_path: movie.poster_path.clone(),
            vote_average: Some(movie.vote_average),
            release_date: movie.release_date.clone(),
        }
    }
}

impl From<&MovieDetails> for MovieCandidate {
    fn from(movie: &MovieDetails) -> Self {
        Self::from(&movie.summary)
    }
}

pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/')))
}

/// First YouTube trailer, as a watch URL.
pub fn trailer_url(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|video| video.kind == "Trailer" && video.site == "YouTube")
        .map(|video| format!("https://www.youtube.com/watch?v={}", video.key))
}

pub fn release_year(date: Option<&str>) -> Option<&str> {
    let year = date?.split('-').next()?.trim();
    (year.len() == 4 && year.chars().all(|ch| ch.is_ascii_digit())).then_some(year)
}

/// Accepts a numeric genre id or a home genre name (case-insensitive).
pub fn resolve_genre(raw: &str) -> Option<(u32, String)> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u32>() {
        let name = HOME_GENRES
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| format!("Genre {id}"));
        return Some((id, name));
    }

    let wanted = normalize_genre_name(raw);
    HOME_GENRES
        .iter()
        .find(|(_, name)| normalize_genre_name(name) == wanted)
        .map(|(id, name)| (*id, (*name).to_string()))
}

fn normalize_genre_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
