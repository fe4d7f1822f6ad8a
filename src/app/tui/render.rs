use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Gauge, Padding, Paragraph, Row, Table, TableState,
    Wrap,
};

use crate::store::{MAX_ENTRIES, WatchEntry};

use super::super::format::{
    format_rating, format_touched_display, format_year, progress_ratio, truncate,
};
use super::{PendingDelete, PendingNotice};

const ACCENT: Color = Color::Rgb(229, 9, 20);
const MUTED: Color = Color::Rgb(185, 190, 200);

pub(super) fn draw_tui(
    frame: &mut Frame,
    items: &[WatchEntry],
    table_state: &mut TableState,
    status: &str,
    in_flight: Option<u64>,
    pending_delete: Option<&PendingDelete>,
    pending_notice: Option<&PendingNotice>,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected_text = table_state
        .selected()
        .map(|idx| (idx + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "CINETRACK",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{}/{MAX_ENTRIES} on shelf", items.len()),
            Style::default().fg(MUTED),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(format!("selected {selected_text}"), Style::default().fg(MUTED)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Continue Watching"));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(chunks[1]);
    let details_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(body_chunks[1]);

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            Row::new(vec![
                Cell::from(item.display_title().to_string()),
                Cell::from(format_year(item.release_date.as_deref())),
                Cell::from(format_rating(item.vote_average)),
                Cell::from(format!("{}%", item.progress)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["Title", "Year", "Rating", "Progress"])
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(panel_block("Shelf"))
    .row_highlight_style(
        Style::default()
            .bg(ACCENT)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], table_state);

    let selected = table_state.selected().and_then(|idx| items.get(idx));
    let selection_text = match selected {
        Some(item) => {
            let mut text = format!(
                "Title\n{}\n\nReleased\n{}\n\nRating\n{}\n\nMovie ID\n{}\n\nLast Touched\n{}",
                truncate(item.display_title(), 40),
                item.release_date.as_deref().unwrap_or("-"),
                format_rating(item.vote_average),
                item.id,
                format_touched_display(item.timestamp),
            );
            if in_flight == Some(item.id) {
                text.push_str("\n\nDetails\nLoading...");
            }
            text
        }
        None => "Shelf is empty.\n\nOpen a movie with `cinetrack details <id>` to add it."
            .to_string(),
    };
    let selection = Paragraph::new(selection_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .block(panel_block("Selected"))
        .wrap(Wrap { trim: true });
    frame.render_widget(selection, details_chunks[0]);
    if let Some(item) = selected {
        let progress = Gauge::default()
            .block(panel_block("Progress"))
            .gauge_style(
                Style::default()
                    .fg(ACCENT)
                    .bg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .label(format!("{}%", item.progress))
            .ratio(progress_ratio(item.progress));
        frame.render_widget(progress, details_chunks[1]);
    }

    let controls = Paragraph::new(Line::from(Span::styled(
        "↑/↓ move  Enter details  d remove  r reload  q quit",
        Style::default().fg(MUTED),
    )))
    .alignment(Alignment::Center)
    .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);

    if let Some(confirm) = pending_delete {
        let popup_text = format!(
            "Remove from continue watching?\n\n{}\n\n[y / Enter] Remove   [n / Esc] Cancel",
            truncate(&confirm.title, 56)
        );
        render_popup(frame, "Confirm Remove", &popup_text);
    } else if let Some(notice) = pending_notice {
        render_popup(frame, notice.heading, &notice.message);
    }
}

fn render_popup(frame: &mut Frame, title: &'static str, text: &str) {
    let popup_area = popup_rect_for_text(frame.area(), text);
    render_popup_shadow(frame, popup_area);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(modal_block(title));
    frame.render_widget(popup, popup_area);
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 130, 140)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24)));
    frame.render_widget(shadow_block, shadow);
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let wrapped_lines: u16 = text
        .lines()
        .map(|line| (line.chars().count() as u16 / 68).saturating_add(1))
        .sum();

    let available_width = area.width.saturating_sub(2).max(1);
    let width = max_line_width
        .saturating_add(12)
        .clamp(48.min(available_width), 80.min(available_width));

    let available_height = area.height.saturating_sub(2).max(1);
    let height = wrapped_lines
        .saturating_add(6)
        .clamp(10.min(available_height), 24.min(available_height));

    centered_fixed_rect(width, height, area)
}
