mod actions;
mod render;
mod session;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::catalog::MovieReport;
use crate::store::{ContinueWatchingStore, KeyValueStore, MAX_ENTRIES};

use super::Catalog;
use super::format::truncate;

use self::actions::{
    apply_details_result, delete_selected, refresh_items, spawn_details_fetch, status_error,
    status_info,
};
use self::render::draw_tui;
use self::session::TuiSession;

#[derive(Debug, Clone)]
pub(super) struct PendingDelete {
    pub(super) id: u64,
    pub(super) title: String,
}

#[derive(Debug, Clone)]
pub(super) struct PendingNotice {
    pub(super) heading: &'static str,
    pub(super) message: String,
}

#[derive(Debug)]
pub(super) struct DetailsFetchResult {
    pub(super) id: u64,
    pub(super) outcome: Result<MovieReport, String>,
}

pub(crate) fn run_tui<S: KeyValueStore>(
    store: &ContinueWatchingStore<S>,
    catalog: Option<Catalog>,
) -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut items = store.load();
    let mut table_state = TableState::default();
    table_state.select((!items.is_empty()).then_some(0));
    let mut pending_delete = None::<PendingDelete>;
    let mut pending_notice = None::<PendingNotice>;
    let mut in_flight = None::<u64>;
    let (details_tx, details_rx) = mpsc::channel::<DetailsFetchResult>();
    let mut status = if items.is_empty() {
        status_info("Shelf is empty. Run `cinetrack details <id>` to add movies.")
    } else {
        status_info(&format!("Ready. {} of {MAX_ENTRIES} slots used.", items.len()))
    };

    loop {
        while let Ok(result) = details_rx.try_recv() {
            in_flight = None;
            match apply_details_result(store, &mut items, &mut table_state, result) {
                Ok(notice) => {
                    status = status_info("Details loaded; moved to front of shelf.");
                    pending_notice = Some(notice);
                }
                Err(message) => status = status_error(&message),
            }
        }

        terminal.draw(|frame| {
            draw_tui(
                frame,
                &items,
                &mut table_state,
                &status,
                in_flight,
                pending_delete.as_ref(),
                pending_notice.as_ref(),
            )
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if pending_notice.is_some() {
            pending_notice = None;
            continue;
        }

        if let Some(dialog) = pending_delete.take() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    status = delete_selected(store, &mut items, &mut table_state, &dialog);
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    status = status_info("Remove canceled.");
                }
                _ => pending_delete = Some(dialog),
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('r') => {
                refresh_items(store, &mut items, &mut table_state, None);
                status = status_info(&format!("Reloaded {} entries.", items.len()));
            }
            KeyCode::Up => {
                if let Some(selected) = table_state.selected() {
                    table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = table_state.selected()
                    && !items.is_empty()
                {
                    let next = (selected + 1).min(items.len().saturating_sub(1));
                    table_state.select(Some(next));
                }
            }
            KeyCode::Char('d') => {
                let Some(item) = table_state.selected().and_then(|idx| items.get(idx)) else {
                    status = status_error("Remove failed: no entry selected.");
                    continue;
                };
                pending_delete = Some(PendingDelete {
                    id: item.id,
                    title: item.display_title().to_string(),
                });
                status = status_info("Confirm remove: y/Enter to remove, n/Esc to cancel.");
            }
            KeyCode::Enter => {
                let Some(item) = table_state.selected().and_then(|idx| items.get(idx)) else {
                    continue;
                };
                let Some(catalog) = catalog.as_ref() else {
                    status = status_error("Details unavailable: TMDB_API_KEY is not configured.");
                    continue;
                };
                if in_flight.is_some() {
                    status = status_info("Still loading the previous movie...");
                    continue;
                }
                in_flight = Some(item.id);
                status = status_info(&format!(
                    "Loading details for {}...",
                    truncate(item.display_title(), 40)
                ));
                spawn_details_fetch(catalog.clone(), item.id, details_tx.clone());
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}
