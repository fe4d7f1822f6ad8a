use chrono::{Local, TimeZone};

use crate::catalog::{MovieReport, MovieSummary, image_url, release_year};
use crate::config::ApiConfig;
use crate::store::WatchEntry;

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

/// `139` -> `2h 19m`.
pub(crate) fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub(crate) fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(value) if value.is_finite() => format!("{value:.1}"),
        _ => "-".to_string(),
    }
}

pub(crate) fn format_year(release_date: Option<&str>) -> String {
    release_year(release_date).unwrap_or("-").to_string()
}

pub(crate) fn format_language(code: Option<&str>) -> String {
    code.map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "N/A".to_string())
}

/// Epoch milliseconds in local time; raw value when out of range.
pub(crate) fn format_touched_display(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub(crate) fn progress_ratio(progress: u8) -> f64 {
    (f64::from(progress) / 100.0).clamp(0.0, 1.0)
}

pub(crate) fn shelf_table(entries: &[WatchEntry]) -> String {
    let mut out = format!(
        "{:<10} {:<40} {:<6} {:<6} {:<9} {:<18}\n",
        "ID", "TITLE", "YEAR", "RATING", "PROGRESS", "LAST TOUCHED"
    );
    for entry in entries {
        out.push_str(&format!(
            "{:<10} {:<40} {:<6} {:<6} {:<9} {:<18}\n",
            entry.id,
            truncate(entry.display_title(), 40),
            format_year(entry.release_date.as_deref()),
            format_rating(entry.vote_average),
            format!("{}%", entry.progress),
            format_touched_display(entry.timestamp),
        ));
    }
    out
}

pub(crate) fn movie_table(movies: &[MovieSummary]) -> String {
    let mut out = format!("{:<10} {:<48} {:<6} {:<6}\n", "ID", "TITLE", "YEAR", "RATING");
    for movie in movies {
        out.push_str(&format!(
            "{:<10} {:<48} {:<6} {:<6}\n",
            movie.id,
            truncate(&movie.title, 48),
            format_year(movie.release_date.as_deref()),
            format_rating(Some(movie.vote_average)),
        ));
    }
    out
}

pub(crate) const CAST_LIMIT: usize = 8;

pub(crate) fn report_text(report: &MovieReport, config: &ApiConfig) -> String {
    let details = &report.details;
    let movie = &details.summary;
    let mut lines = vec![format!(
        "{} ({})",
        movie.title,
        format_year(movie.release_date.as_deref())
    )];
    if let Some(tagline) = details.tagline.as_deref() {
        lines.push(format!("  \"{tagline}\""));
    }
    lines.push(String::new());
    lines.push(format!("Rating:     {}", format_rating(Some(movie.vote_average))));
    lines.push(format!(
        "Released:   {}",
        movie.release_date.as_deref().unwrap_or("-")
    ));
    if let Some(runtime) = details.runtime.filter(|minutes| *minutes > 0) {
        lines.push(format!("Runtime:    {}", format_runtime(runtime)));
    }
    lines.push(format!(
        "Language:   {}",
        format_language(details.original_language.as_deref())
    ));
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|genre| genre.name.as_str()).collect();
        lines.push(format!("Genres:     {}", names.join(", ")));
    }

    if let Some(enrichment) = &report.enrichment {
        lines.push(format!(
            "Director:   {}",
            enrichment.director.as_deref().unwrap_or("Unknown")
        ));
        lines.push(format!(
            "Writer:     {}",
            enrichment.writer.as_deref().unwrap_or("Unknown")
        ));
        lines.push(format!(
            "Box Office: {}",
            enrichment.box_office.as_deref().unwrap_or("Unknown")
        ));
        lines.push(format!(
            "Awards:     {}",
            enrichment.awards.as_deref().unwrap_or("None")
        ));
    }

    if !movie.overview.trim().is_empty() {
        lines.push(String::new());
        lines.push("Overview".to_string());
        lines.push(format!("  {}", movie.overview.trim()));
    }

    if let Some(enrichment) = report.enrichment.as_ref().filter(|e| !e.ratings.is_empty()) {
        lines.push(String::new());
        lines.push("Ratings".to_string());
        for rating in &enrichment.ratings {
            lines.push(format!("  {:<28} {}", rating.source, rating.value));
        }
    }

    let cast = details.cast();
    if !cast.is_empty() {
        lines.push(String::new());
        lines.push("Cast".to_string());
        for member in cast.iter().take(CAST_LIMIT) {
            match member.character.as_deref().filter(|c| !c.is_empty()) {
                Some(character) => lines.push(format!("  {} as {character}", member.name)),
                None => lines.push(format!("  {}", member.name)),
            }
        }
    }

    if !report.similar.is_empty() {
        lines.push(String::new());
        lines.push("Similar Movies".to_string());
        for similar in &report.similar {
            lines.push(format!(
                "  [{}] {} ({})",
                similar.id,
                similar.title,
                format_year(similar.release_date.as_deref())
            ));
        }
    }

    lines.push(String::new());
    if let Some(trailer) = &report.trailer {
        lines.push(format!("Trailer:    {trailer}"));
    }
    if let Some(url) = image_url(&config.poster_base_url, movie.poster_path.as_deref()) {
        lines.push(format!("Poster:     {url}"));
    }
    if let Some(url) = image_url(&config.backdrop_base_url, movie.backdrop_path.as_deref()) {
        lines.push(format!("Backdrop:   {url}"));
    }

    lines.join("\n")
}

/// Short form for the TUI popup.
pub(crate) fn report_summary(report: &MovieReport) -> String {
    let details = &report.details;
    let movie = &details.summary;
    let mut text = format!(
        "{} ({})\n\nRating {}",
        truncate(&movie.title, 50),
        format_year(movie.release_date.as_deref()),
        format_rating(Some(movie.vote_average)),
    );
    if let Some(runtime) = details.runtime.filter(|minutes| *minutes > 0) {
        text.push_str(&format!("   Runtime {}", format_runtime(runtime)));
    }
    if let Some(director) = report
        .enrichment
        .as_ref()
        .and_then(|enrichment| enrichment.director.as_deref())
    {
        text.push_str(&format!("\nDirector {}", truncate(director, 40)));
    }
    if !movie.overview.trim().is_empty() {
        text.push_str(&format!("\n\n{}", truncate(movie.overview.trim(), 280)));
    }
    if let Some(trailer) = &report.trailer {
        text.push_str(&format!("\n\n{trailer}"));
    }
    text.push_str("\n\nPress any key to continue.");
    text
}
