//! Pager bar rendering.
//!
//! Displays the Prev / numbered / Next page buttons for the live result set.

use crate::app::{App, Focus};
use crate::pagination::PageButton;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

/// Blank columns between two buttons.
const BUTTON_GAP: u16 = 1;

/// Lay out the pager buttons inside `area`.
///
/// # Returns
/// * `Vec<(Rect, PageButton)>` - Screen cell range of each button
///
/// # Details
/// Buttons are centered on the line below the top border. The same layout
/// is used for drawing and for mouse hit testing.
pub fn button_areas(app: &App, area: Rect) -> Vec<(Rect, PageButton)> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if inner.height == 0 {
        return Vec::new();
    }

    let widths: Vec<u16> = app
        .pager
        .buttons()
        .iter()
        .map(|button| Span::raw(button_text(button)).width() as u16)
        .collect();
    let total: u16 = widths.iter().sum::<u16>()
        + BUTTON_GAP * (widths.len().saturating_sub(1) as u16);

    let mut x = inner.x + inner.width.saturating_sub(total) / 2;
    let mut areas = Vec::with_capacity(widths.len());
    for (button, width) in app.pager.buttons().iter().zip(widths) {
        let rect = Rect::new(x, inner.y, width, 1).intersection(inner);
        areas.push((rect, *button));
        x = x.saturating_add(width + BUTTON_GAP);
    }
    areas
}

/// Button under the screen cell (`column`, `row`), if any.
pub fn button_at(app: &App, area: Rect, column: u16, row: u16) -> Option<PageButton> {
    button_areas(app, area)
        .into_iter()
        .find(|(rect, _)| {
            row == rect.y && column >= rect.x && column < rect.x + rect.width
        })
        .map(|(_, button)| button)
}

fn button_text(button: &PageButton) -> String {
    format!("[{}]", button.label())
}

/// Render the pager bar.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Draws only the frame when there is a single page or none. The active
/// page is highlighted; the keyboard cursor is drawn reversed when the pager
/// has focus.
pub fn render_pager(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.focus == Focus::Pager;
    let block = Block::default()
        .title(if is_active { "Pages (ACTIVE)" } else { "Pages" })
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    Widget::render(block, area, buf);

    for (idx, (rect, button)) in button_areas(app, area).into_iter().enumerate() {
        let mut style = if button.active {
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if is_active && idx == app.pager_index {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Widget::render(Span::styled(button_text(&button), style), rect, buf);
    }
}
