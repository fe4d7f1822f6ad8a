use super::format::*;
use super::*;
use crate::catalog::{CastMember, Credits, Enrichment, Genre, MovieDetails, MovieReport, MovieSummary};
use crate::store::{MemoryStore, STORAGE_KEY};

fn summary(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some("/poster.jpg".to_string()),
        backdrop_path: None,
        vote_average: 7.25,
        release_date: Some("2010-07-16".to_string()),
        overview: "A thief who steals corporate secrets.".to_string(),
    }
}

fn config() -> ApiConfig {
    ApiConfig::from_lookup(|name| match name {
        "TMDB_API_KEY" => Some("0123456789abcdef0123456789abcdef".to_string()),
        _ => None,
    })
    .expect("config")
}

fn report() -> MovieReport {
    MovieReport {
        details: MovieDetails {
            summary: summary(27205, "Inception"),
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            runtime: Some(148),
            original_language: Some("en".to_string()),
            tagline: Some("Your mind is the scene of the crime.".to_string()),
            credits: Some(Credits {
                cast: (1..=10)
                    .map(|n| CastMember {
                        name: format!("Actor {n}"),
                        character: (n % 2 == 0).then(|| format!("Role {n}")),
                    })
                    .collect(),
            }),
        },
        enrichment: Some(Enrichment {
            director: Some("Christopher Nolan".to_string()),
            writer: None,
            ..Enrichment::default()
        }),
        trailer: Some("https://www.youtube.com/watch?v=YoHD9XEInc0".to_string()),
        similar: vec![summary(1, "Memento")],
    }
}

#[test]
fn format_runtime_splits_hours_and_minutes() {
    assert_eq!(format_runtime(139), "2h 19m");
    assert_eq!(format_runtime(45), "0h 45m");
    assert_eq!(format_runtime(120), "2h 0m");
}

#[test]
fn format_language_upper_cases_or_reports_missing() {
    assert_eq!(format_language(Some("en")), "EN");
    assert_eq!(format_language(Some(" ")), "N/A");
    assert_eq!(format_language(None), "N/A");
}

#[test]
fn format_rating_handles_missing_and_non_finite_values() {
    assert_eq!(format_rating(Some(8.44)), "8.4");
    assert_eq!(format_rating(Some(f64::NAN)), "-");
    assert_eq!(format_rating(None), "-");
}

#[test]
fn truncate_appends_ellipsis_only_when_needed() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long movie title", 10), "a very ...");
}

#[test]
fn progress_ratio_is_clamped() {
    assert_eq!(progress_ratio(30), 0.3);
    assert_eq!(progress_ratio(250), 1.0);
}

#[test]
fn shelf_table_lists_entries_in_shelf_order() {
    let store = ContinueWatchingStore::with_clock(MemoryStore::default(), || 0);
    store.upsert(&MovieCandidate::new(1, "First")).expect("upsert");
    store.upsert(&MovieCandidate::new(2, "Second")).expect("upsert");

    let table = shelf_table(&store.load());
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID"));
    assert!(lines[1].contains("Second") && lines[1].contains("30%"));
    assert!(lines[2].contains("First"));
}

#[test]
fn report_text_includes_all_sections() {
    let text = report_text(&report(), &config());

    assert!(text.starts_with("Inception (2010)"));
    assert!(text.contains("Runtime:    2h 28m"));
    assert!(text.contains("Language:   EN"));
    assert!(text.contains("Genres:     Action, Science Fiction"));
    assert!(text.contains("Director:   Christopher Nolan"));
    assert!(text.contains("Writer:     Unknown"));
    assert!(text.contains("Awards:     None"));
    assert!(text.contains("Actor 2 as Role 2"));
    assert!(text.contains("Actor 8"));
    assert!(!text.contains("Actor 9"));
    assert!(text.contains("[1] Memento (2010)"));
    assert!(text.contains("Trailer:    https://www.youtube.com/watch?v=YoHD9XEInc0"));
    assert!(text.contains("Poster:     https://image.tmdb.org/t/p/w500/poster.jpg"));
    assert!(!text.contains("Backdrop:"));
}

#[test]
fn report_text_omits_enrichment_when_unavailable() {
    let mut report = report();
    report.enrichment = None;
    report.details.runtime = Some(0);

    let text = report_text(&report, &config());

    assert!(!text.contains("Director:"));
    assert!(!text.contains("Runtime:"));
}

#[test]
fn report_summary_is_compact() {
    let text = report_summary(&report());
    assert!(text.starts_with("Inception (2010)"));
    assert!(text.contains("Runtime 2h 28m"));
    assert!(text.contains("Director Christopher Nolan"));
    assert!(text.ends_with("Press any key to continue."));
}

#[test]
fn record_view_returns_intended_list_when_write_fails() {
    let store = ContinueWatchingStore::with_clock(MemoryStore::default(), || 5);
    record_view(&store, &MovieCandidate::new(1, "Kept"));
    store.backend().fail_writes(true);

    let entries = record_view(&store, &MovieCandidate::new(2, "Unsaved"));

    assert_eq!(
        entries.iter().map(|entry| entry.id).collect::<Vec<_>>(),
        vec![2, 1]
    );
    store.backend().fail_writes(false);
    assert_eq!(store.load().len(), 1);
}

#[test]
fn record_view_ignores_candidates_without_id() {
    let store = ContinueWatchingStore::with_clock(MemoryStore::default(), || 5);
    record_view(&store, &MovieCandidate::new(1, "Kept"));

    let entries = record_view(&store, &MovieCandidate::default());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, 1);
}

#[test]
fn dismiss_removes_entry_and_tolerates_unknown_ids() {
    let store = ContinueWatchingStore::with_clock(MemoryStore::default(), || 5);
    record_view(&store, &MovieCandidate::new(1, "A"));
    record_view(&store, &MovieCandidate::new(2, "B"));

    assert_eq!(dismiss(&store, 1).len(), 1);
    assert_eq!(dismiss(&store, 999).len(), 1);
    assert!(store.get(1).is_none());
}

#[test]
fn dismiss_on_corrupt_storage_yields_empty_shelf() {
    let store = ContinueWatchingStore::with_clock(
        MemoryStore::with_value(STORAGE_KEY, "[{\"id\":"),
        || 5,
    );

    assert!(dismiss(&store, 1).is_empty());
    assert_eq!(store.backend().raw(STORAGE_KEY).as_deref(), Some("[]"));
}

#[test]
fn record_view_during_read_failure_leaves_storage_alone() {
    let store = ContinueWatchingStore::with_clock(MemoryStore::default(), || 5);
    record_view(&store, &MovieCandidate::new(1, "A"));
    record_view(&store, &MovieCandidate::new(2, "B"));
    store.backend().fail_reads(true);

    assert!(record_view(&store, &MovieCandidate::new(3, "C")).is_empty());
    assert!(dismiss(&store, 1).is_empty());

    store.backend().fail_reads(false);
    assert_eq!(
        store.load().iter().map(|entry| entry.id).collect::<Vec<_>>(),
        vec![2, 1]
    );
}
