//! Filter form rendering.
//!
//! Displays the genre, mood and sort-by controls and which one has the cursor.

use crate::app::{App, FilterField, Focus};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the filter form.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// One line per control, with the focused control marked and its value
/// wrapped in arrows. When the form has focus a hint line is added.
pub fn render_filters(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.focus == Focus::Filters;
    let mut lines = Vec::with_capacity(FilterField::ALL.len() + 1);

    for field in FilterField::ALL {
        let is_current = is_active && app.form.field == field;
        let marker = if is_current { "▶ " } else { "  " };
        let value = app.form.display_value(field);
        let value_text = if is_current {
            format!("◀ {} ▶", value)
        } else {
            format!("  {}  ", value)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:<9}", format!("{}:", field.label())),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                value_text,
                if is_current {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                },
            ),
        ]));
    }

    if is_active {
        lines.push(Line::from(Span::styled(
            "↑/↓ choose field, ←/→ change value, Enter to find movies",
            Style::default().fg(Color::Yellow),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(if is_active {
                "Filters (ACTIVE)"
            } else {
                "Filters (Tab to focus)"
            })
            .borders(Borders::ALL)
            .style(if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );

    Widget::render(paragraph, area, buf);
}

/// Control drawn on screen row `row`, if any.
pub fn field_at(area: Rect, row: u16) -> Option<FilterField> {
    // First control sits just below the top border.
    let offset = row.checked_sub(area.y + 1)? as usize;
    FilterField::ALL.get(offset).copied()
}
