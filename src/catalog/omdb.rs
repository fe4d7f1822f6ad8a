use serde::Deserialize;
use tracing::{debug, info};

use super::{CatalogError, decode};
use crate::http::{RetryPolicy, get_text_with_retries};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticRating {
    pub source: String,
    pub value: String,
}

/// Supplementary fields for a details view. Absent values were reported
/// as `"N/A"` upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub director: Option<String>,
    pub writer: Option<String>,
    pub box_office: Option<String>,
    pub ratings: Vec<CriticRating>,
    pub awards: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmdbLookup {
    Found(Enrichment),
    NotFound { reason: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResponse {
    response: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    writer: Option<String>,
    #[serde(default)]
    box_office: Option<String>,
    #[serde(default)]
    awards: Option<String>,
    #[serde(default)]
    ratings: Vec<RawRating>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRating {
    source: String,
    value: String,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty() && text != "N/A")
}

pub(crate) fn parse_lookup(raw: &str) -> Result<OmdbLookup, CatalogError> {
    let parsed: RawResponse = decode(raw, "supplementary metadata")?;
    if !parsed.response.eq_ignore_ascii_case("true") {
        return Ok(OmdbLookup::NotFound {
            reason: present(parsed.error),
        });
    }

    Ok(OmdbLookup::Found(Enrichment {
        director: present(parsed.director),
        writer: present(parsed.writer),
        box_office: present(parsed.box_office),
        awards: present(parsed.awards),
        ratings: parsed
            .ratings
            .into_iter()
            .map(|rating| CriticRating {
                source: rating.source,
                value: rating.value,
            })
            .collect(),
    }))
}

/// Client for the supplementary metadata service.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    base_url: String,
    api_key: String,
    policy: RetryPolicy,
}

impl OmdbClient {
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

    pub fn lookup(&self, title: &str, year: Option<&str>) -> Result<OmdbLookup, CatalogError> {
        let query = vec![
            ("apikey".to_string(), self.api_key.clone()),
            ("t".to_string(), title.to_string()),
            ("y".to_string(), year.unwrap_or_default().to_string()),
        ];
        let url = format!("{}/", self.base_url.trim_end_matches('/'));

        info!(title, year, "supplementary lookup");
        let raw = get_text_with_retries(&url, &query, &self.policy)?;
        let lookup = parse_lookup(&raw)?;
        if let OmdbLookup::NotFound { reason } = &lookup {
            debug!(title, reason = reason.as_deref(), "no supplementary match");
        }
        Ok(lookup)
    }
}
