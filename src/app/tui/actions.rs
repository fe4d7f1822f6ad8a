use std::sync::mpsc;

use ratatui::widgets::TableState;
use tracing::info;

use crate::catalog::build_report;
use crate::store::{ContinueWatchingStore, KeyValueStore, MovieCandidate, WatchEntry};

use super::super::format::{report_summary, truncate};
use super::super::{Catalog, dismiss, record_view};
use super::{DetailsFetchResult, PendingDelete, PendingNotice};

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

pub(super) fn select_preferred(
    items: &[WatchEntry],
    table_state: &mut TableState,
    preferred_id: Option<u64>,
) {
    if items.is_empty() {
        table_state.select(None);
        return;
    }

    if let Some(id) = preferred_id
        && let Some(idx) = items.iter().position(|item| item.id == id)
    {
        table_state.select(Some(idx));
        return;
    }

    match table_state.selected() {
        Some(selected) => table_state.select(Some(selected.min(items.len() - 1))),
        None => table_state.select(Some(0)),
    }
}

pub(super) fn refresh_items<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    items: &mut Vec<WatchEntry>,
    table_state: &mut TableState,
    preferred_id: Option<u64>,
) {
    *items = store.load();
    select_preferred(items, table_state, preferred_id);
}

pub(super) fn delete_selected<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    items: &mut Vec<WatchEntry>,
    table_state: &mut TableState,
    dialog: &PendingDelete,
) -> String {
    let existed = items.iter().any(|item| item.id == dialog.id);
    *items = dismiss(store, dialog.id);
    select_preferred(items, table_state, None);
    if existed {
        status_info(&format!("Removed from shelf: {}", truncate(&dialog.title, 50)))
    } else {
        status_error("Remove failed: entry no longer exists.")
    }
}

pub(super) fn spawn_details_fetch(catalog: Catalog, id: u64, tx: mpsc::Sender<DetailsFetchResult>) {
    std::thread::spawn(move || {
        info!(id, "fetching details in background");
        let outcome = catalog
            .tmdb
            .movie_details(id)
            .map(|details| build_report(&catalog.tmdb, catalog.omdb.as_ref(), details))
            .map_err(|err| err.to_string());
        let _ = tx.send(DetailsFetchResult { id, outcome });
    });
}

/// Records the opened movie on the shelf and builds the popup for it.
pub(super) fn apply_details_result<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    items: &mut Vec<WatchEntry>,
    table_state: &mut TableState,
    result: DetailsFetchResult,
) -> Result<PendingNotice, String> {
    let report = result
        .outcome
        .map_err(|err| format!("Details failed for movie {}: {err}", result.id))?;

    *items = record_view(store, &MovieCandidate::from(&report.details));
    select_preferred(items, table_state, Some(result.id));
    Ok(PendingNotice {
        heading: "Movie Details",
        message: report_summary(&report),
    })
}
