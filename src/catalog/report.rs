use tracing::warn;

use super::{
    Enrichment, MovieDetails, MovieSummary, OmdbClient, OmdbLookup, TmdbClient, release_year,
    trailer_url,
};

pub const SIMILAR_LIMIT: usize = 6;

/// Everything a details view shows for one movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieReport {
    pub details: MovieDetails,
    pub enrichment: Option<Enrichment>,
    pub trailer: Option<String>,
    pub similar: Vec<MovieSummary>,
}

/// Fills in the secondary sections around already-fetched details.
///
/// Failures of the secondary requests are logged and leave their section
/// empty; only the primary details fetch is fatal to a details view.
pub fn build_report(
    tmdb: &TmdbClient,
    omdb: Option<&OmdbClient>,
    details: MovieDetails,
) -> MovieReport {
    let id = details.summary.id;

    let enrichment = omdb.and_then(|client| {
        let year = release_year(details.summary.release_date.as_deref());
        match client.lookup(&details.summary.title, year) {
            Ok(OmdbLookup::Found(enrichment)) => Some(enrichment),
            Ok(OmdbLookup::NotFound { .. }) => None,
            Err(err) => {
                warn!(id, error = %err, "supplementary lookup failed");
                None
            }
        }
    });

    let trailer = match tmdb.videos(id) {
        Ok(videos) => trailer_url(&videos),
        Err(err) => {
            warn!(id, error = %err, "video lookup failed");
            None
        }
    };

    let similar = match tmdb.similar(id) {
        Ok(page) => page.results.into_iter().take(SIMILAR_LIMIT).collect(),
        Err(err) => {
            warn!(id, error = %err, "similar lookup failed");
            Vec::new()
        }
    };

    MovieReport {
        details,
        enrichment,
        trailer,
        similar,
    }
}
