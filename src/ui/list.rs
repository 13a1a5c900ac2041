//! Subscriber table widget rendering.
//!
//! Displays the filtered subscribers with selection highlighting.

use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

/// Render the subscriber table.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Shows one row per visible subscriber (email, subscription date, status).
/// The title shows visible/total counts. Shows an empty-state message when
/// nothing matches the search.
pub fn render_list(app: &App, area: Rect, buf: &mut Buffer) {
    let list = &app.subscribers;
    let title = format!(
        "Subscribers ({}/{})  [d] delete  [e] export  [n] request tank",
        list.visible_count(),
        list.total_count()
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    let records = list.visible_records();
    if records.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No subscribers found",
            Style::default().fg(Color::Gray),
        )))
        .block(block);
        Widget::render(empty, area, buf);
        return;
    }

    let header = Row::new(vec!["Email", "Subscription Date", "Status"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            Row::new(vec![
                Span::styled(record.email.clone(), Style::default().fg(Color::White)),
                Span::styled(record.format_joined(), Style::default().fg(Color::Yellow)),
                Span::styled(record.status.to_string(), Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(55),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    state.select(Some(list.selected_index.min(records.len() - 1)));

    StatefulWidget::render(table, area, buf, &mut state);
}
