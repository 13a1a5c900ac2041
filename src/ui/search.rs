//! Subscriber search bar rendering.

use crate::app::{App, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the email search bar.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// The title reports how many subscribers the current term matches. A term
/// with no matches is shown in red with a hint to clear it.
pub fn render_search(app: &App, area: Rect, buf: &mut Buffer) {
    let list = &app.subscribers;
    let is_active = app.mode == UiMode::Search;
    let term = list.search_query();
    let no_matches = !term.is_empty() && list.visible_count() == 0;

    let title = if term.is_empty() {
        format!("Search ({} subscribers)", list.total_count())
    } else {
        format!(
            "Search ({} of {} match)",
            list.visible_count(),
            list.total_count()
        )
    };

    let term_style = if no_matches {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::styled("Email: ", Style::default().fg(Color::Yellow)),
        Span::styled(term.to_string(), term_style),
    ];
    if is_active {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    if no_matches {
        spans.push(Span::styled(
            "  no matching subscribers (Backspace to edit)",
            Style::default().fg(Color::DarkGray),
        ));
    } else if !is_active && term.is_empty() {
        spans.push(Span::styled(
            "press '/' to filter by email",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let border_style = if is_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    Widget::render(paragraph, area, buf);
}
