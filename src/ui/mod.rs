//! UI components module.
//!
//! Contains ratatui widgets for displaying the application interface.

pub mod filters;
pub mod grid;
pub mod pager;

pub use filters::render_filters;
pub use grid::render_results;
pub use pager::render_pager;

use crate::app::{App, Focus};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Screen regions, shared by drawing and mouse hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub filters: Rect,
    pub results: Rect,
    pub pager: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Filters
                Constraint::Min(0),    // Movie grid
                Constraint::Length(3), // Pager
                Constraint::Length(1), // Status bar
            ])
            .split(area);
        Self {
            filters: chunks[0],
            results: chunks[1],
            pager: chunks[2],
            status: chunks[3],
        }
    }
}

/// Render the complete UI.
///
/// # Details
/// Lays out and renders the filter form, movie grid, pager and status bar.
pub fn render(f: &mut Frame, app: &App) -> ScreenLayout {
    let layout = ScreenLayout::new(f.area());
    let buf = f.buffer_mut();

    render_filters(app, layout.filters, buf);
    render_results(app, layout.results, buf);
    render_pager(app, layout.pager, buf);
    render_status(app, layout.status, buf);

    layout
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let hint = match app.focus {
        Focus::Filters => "Tab: switch focus | Enter: apply | n/p: next/prev page | q: quit",
        Focus::Results => "Tab: switch focus | arrows: move | n/p: next/prev page | q: quit",
        Focus::Pager => "Tab: switch focus | ←/→: choose page | Enter: go | q: quit",
    };
    let status_style = if app.is_loading() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let line = match app.status_message.as_deref() {
        Some(status) => Line::from(vec![
            Span::styled(status, status_style),
            Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
            Span::styled(hint, Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
    };
    Widget::render(Paragraph::new(line), area, buf);
}

/// Flatten a buffer to text, one line per row.
#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let width = buf.area.width as usize;
    buf.content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_layout_regions() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.filters.height, 6);
        assert_eq!(layout.pager.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.results.height, 30);
        assert_eq!(layout.status.y, 39);
    }

    #[test]
    fn test_full_frame_renders() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new(&Config::default());
        app.apply_filters();

        let mut layout = ScreenLayout::default();
        terminal
            .draw(|f| {
                layout = render(f, &app);
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Filters (ACTIVE)"));
        assert!(text.contains("Loading recommendations..."));
        assert!(text.contains("Loading page 1..."));
        assert_eq!(layout.pager.height, 3);
    }
}
