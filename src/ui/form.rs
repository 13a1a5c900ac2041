//! Tank request popup rendering.

use crate::requests::{FormField, FormPhase, TankRequestForm, TankRequestService};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

const FIELDS: [FormField; 4] = [
    FormField::Location,
    FormField::Capacity,
    FormField::Purpose,
    FormField::Description,
];

/// Render the tank request form as a popup centred in `area`.
///
/// # Arguments
/// * `form` - Open form
/// * `area` - Area the popup is centred in
/// * `buf` - Buffer to render to
///
/// # Details
/// The focused field is highlighted while the form is editable. The last
/// line shows the submit control, greyed out while a submission is in
/// flight, or the success/failure message.
pub fn render_request_form<S: TankRequestService>(
    form: &TankRequestForm<S>,
    area: Rect,
    buf: &mut Buffer,
) {
    let popup = centered_rect(60, 14, area);
    Clear.render(popup, buf);

    let editable = form.is_editable();
    let mut lines = Vec::with_capacity(FIELDS.len() + 3);

    for field in FIELDS {
        let focused = editable && form.focus() == field;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let value = match field {
            FormField::Purpose => format!("< {} >", form.value(field)),
            _ => form.value(field).to_string(),
        };
        let cursor = if focused && field != FormField::Purpose {
            "_"
        } else {
            ""
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", field.label()), label_style),
            Span::styled(value, Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(status_line(form));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Request New Monitoring Tank")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Yellow)),
    );

    Widget::render(paragraph, popup, buf);
}

fn status_line<S: TankRequestService>(form: &TankRequestForm<S>) -> Line<'static> {
    match form.phase() {
        FormPhase::Idle => Line::from(Span::styled(
            "[Enter] Submit Request   [Tab] Next field   [Esc] Cancel",
            Style::default().fg(Color::Green),
        )),
        FormPhase::Submitting => Line::from(Span::styled(
            "Submitting...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
        FormPhase::Succeeded => Line::from(Span::styled(
            form.success_message().unwrap_or_default(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        FormPhase::Failed(message) => Line::from(vec![
            Span::styled(message.clone(), Style::default().fg(Color::Red)),
            Span::styled("  [Enter] Retry", Style::default().fg(Color::Green)),
        ]),
        FormPhase::Closed => Line::from(""),
    }
}

/// Rectangle of `width_percent` x `height` rows centred in `area`.
fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}
