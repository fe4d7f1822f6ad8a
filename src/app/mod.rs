mod format;
mod tui;

#[cfg(test)]
mod tests;

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::catalog::{
    HOME_GENRES, OmdbClient, TimeWindow, TmdbClient, build_report, resolve_genre,
};
use crate::cli::{Cli, Command};
use crate::config::ApiConfig;
use crate::db::Database;
use crate::paths::database_file_path;
use crate::store::{ContinueWatchingStore, KeyValueStore, MovieCandidate, WatchEntry};

use self::format::{movie_table, report_text, shelf_table};

const TRENDING_LIMIT: usize = 6;
const POPULAR_LIMIT: usize = 12;
const GENRE_LIMIT: usize = 6;

/// Configured clients for the two metadata services.
#[derive(Debug, Clone)]
pub(crate) struct Catalog {
    pub(crate) config: ApiConfig,
    pub(crate) tmdb: TmdbClient,
    pub(crate) omdb: Option<OmdbClient>,
}

impl Catalog {
    pub(crate) fn new(config: ApiConfig) -> Self {
        let tmdb = TmdbClient::new(&config.tmdb_base_url, &config.tmdb_api_key);
        let omdb = config
            .omdb_api_key
            .as_deref()
            .map(|key| OmdbClient::new(&config.omdb_base_url, key));
        Self { config, tmdb, omdb }
    }

    pub(crate) fn from_env() -> Result<Self> {
        let config = ApiConfig::from_env()
            .context("catalog commands need TMDB_API_KEY (see .env)")?;
        if config.omdb_api_key.is_none() {
            warn!("OMDB_API_KEY is not set; details will not be enriched");
        }
        Ok(Self::new(config))
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let db = open_db(cli.db.as_deref())?;
    let store = ContinueWatchingStore::new(&db);

    match cli.command {
        Some(Command::Home) => run_home(&store, &Catalog::from_env()?)?,
        Some(Command::Trending { window }) => run_trending(&Catalog::from_env()?, window)?,
        Some(Command::Popular { page }) => run_popular(&Catalog::from_env()?, page)?,
        Some(Command::Genres) => run_genres(),
        Some(Command::Genre { genre }) => run_genre(&Catalog::from_env()?, &genre)?,
        Some(Command::Search { query, page }) => {
            run_search(&Catalog::from_env()?, &query, page)?;
        }
        Some(Command::Details { id }) => run_details(&store, &Catalog::from_env()?, id)?,
        Some(Command::Shelf) => run_shelf(&store),
        Some(Command::Remove { id }) => run_remove(&store, id),
        Some(Command::Tui) | None => {
            let catalog = match Catalog::from_env() {
                Ok(catalog) => Some(catalog),
                Err(err) => {
                    warn!(error = %err, "catalog unavailable; details disabled in TUI");
                    None
                }
            };
            tui::run_tui(&store, catalog)?;
        }
    }

    Ok(())
}

/// Moves a viewed movie to the front of the shelf. Storage failures are
/// logged and the intended list is returned anyway.
pub(crate) fn record_view<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    candidate: &MovieCandidate,
) -> Vec<WatchEntry> {
    match store.upsert(candidate) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "continue-watching update was not saved");
            err.into_entries().unwrap_or_else(|| store.load())
        }
    }
}

/// Drops a movie from the shelf with the same best-effort policy as
/// [`record_view`].
pub(crate) fn dismiss<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    id: u64,
) -> Vec<WatchEntry> {
    match store.remove(id) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(id, error = %err, "continue-watching removal was not saved");
            err.into_entries().unwrap_or_else(|| store.load())
        }
    }
}

fn run_home<S: KeyValueStore>(store: &ContinueWatchingStore<S>, catalog: &Catalog) -> Result<()> {
    let shelf = store.load();
    if !shelf.is_empty() {
        println!("Continue Watching");
        print!("{}", shelf_table(&shelf));
        println!();
    }

    let trending = catalog.tmdb.trending(TimeWindow::Week)?;
    println!("Trending This Week");
    print!(
        "{}",
        movie_table(&trending.results[..trending.results.len().min(TRENDING_LIMIT)])
    );
    println!();

    let popular = catalog.tmdb.popular(1)?;
    println!("Popular");
    print!(
        "{}",
        movie_table(&popular.results[..popular.results.len().min(POPULAR_LIMIT)])
    );
    Ok(())
}

fn run_trending(catalog: &Catalog, window: TimeWindow) -> Result<()> {
    let page = catalog.tmdb.trending(window)?;
    println!("Trending ({window})");
    print!("{}", movie_table(&page.results));
    Ok(())
}

fn run_popular(catalog: &Catalog, page: u32) -> Result<()> {
    let listing = catalog.tmdb.popular(page)?;
    print!("{}", movie_table(&listing.results));
    println!("Page {} of {}", listing.page, listing.total_pages);
    Ok(())
}

fn run_genres() {
    println!("{:<8} NAME", "ID");
    for (id, name) in HOME_GENRES {
        println!("{id:<8} {name}");
    }
}

fn run_genre(catalog: &Catalog, raw: &str) -> Result<()> {
    let Some((genre_id, name)) = resolve_genre(raw) else {
        bail!("unknown genre `{raw}`; run `cinetrack genres` for the list");
    };
    let listing = catalog.tmdb.discover_by_genre(genre_id)?;
    println!("{name}");
    print!(
        "{}",
        movie_table(&listing.results[..listing.results.len().min(GENRE_LIMIT)])
    );
    Ok(())
}

fn run_search(catalog: &Catalog, query: &str, page: u32) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("search query must not be empty");
    }

    let results = catalog.tmdb.search(query, page)?;
    if results.results.is_empty() {
        println!("No movies found for \"{query}\".");
        return Ok(());
    }

    print!("{}", movie_table(&results.results));
    println!("Page {} of {}", results.page, results.total_pages);
    Ok(())
}

fn run_details<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    catalog: &Catalog,
    id: u64,
) -> Result<()> {
    let details = catalog
        .tmdb
        .movie_details(id)
        .with_context(|| format!("failed to fetch movie {id}"))?;
    let shelf = record_view(store, &MovieCandidate::from(&details));

    let report = build_report(&catalog.tmdb, catalog.omdb.as_ref(), details);
    println!("{}", report_text(&report, &catalog.config));
    if let Some(entry) = shelf.iter().find(|entry| entry.id == id) {
        println!("Progress:   {}%", entry.progress);
    }
    Ok(())
}

fn run_shelf<S: KeyValueStore>(store: &ContinueWatchingStore<S>) {
    let entries = store.load();
    if entries.is_empty() {
        println!("Nothing to continue yet. Run `cinetrack details <id>` to add a movie.");
        return;
    }
    print!("{}", shelf_table(&entries));
}

fn run_remove<S: KeyValueStore>(store: &ContinueWatchingStore<S>, id: u64) {
    let existing = store.get(id);
    let remaining = dismiss(store, id);
    match existing {
        Some(entry) => println!(
            "Removed from continue watching: {} ({} left)",
            entry.display_title(),
            remaining.len()
        ),
        None => println!("Movie {id} is not on the continue-watching shelf."),
    }
}

fn open_db(path: Option<&Path>) -> Result<Database> {
    let db_path = match path {
        Some(path) => path.to_path_buf(),
        None => database_file_path()?,
    };
    let db = Database::open(&db_path)?;
    db.migrate()?;
    Ok(db)
}
