//! Movie card grid rendering.
//!
//! Displays the results area: a grid of movie cards, or the loading, empty,
//! idle or error message that replaces it.

use crate::app::{App, Focus, ResultsView};
use crate::recommend::Movie;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Card width including borders.
pub const CARD_WIDTH: u16 = 40;
/// Card height including borders.
pub const CARD_HEIGHT: u16 = 6;

/// Number of cards per row for a results area `width` columns wide.
pub fn columns_for_width(width: u16) -> usize {
    (width.saturating_sub(2) / CARD_WIDTH).max(1) as usize
}

/// Render the results area.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Keeps the selected card's row on screen by scrolling whole rows.
pub fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let is_active = app.focus == Focus::Results;
    let title = match &app.view {
        ResultsView::Loaded(result) => format!(
            "Movies - page {} of {} (updated {})",
            result.current_page,
            result.total_pages,
            result.fetched_at.format("%H:%M:%S")
        ),
        _ => "Movies".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    Widget::render(block, area, buf);

    let result = match &app.view {
        ResultsView::Idle => {
            render_message(
                "Choose filters and press Enter to get recommendations.",
                Style::default().fg(Color::Gray),
                inner,
                buf,
            );
            return;
        }
        ResultsView::Loading => {
            render_message(
                "Loading recommendations...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                inner,
                buf,
            );
            return;
        }
        ResultsView::Failed(message) => {
            render_message(message, Style::default().fg(Color::Red), inner, buf);
            return;
        }
        ResultsView::Loaded(result) => result,
    };

    if result.is_empty() {
        render_message(
            "No matching movies found.",
            Style::default().fg(Color::Gray),
            inner,
            buf,
        );
        return;
    }

    let columns = columns_for_width(area.width);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected = app.selected_card.min(result.movies.len() - 1);
    let selected_row = selected / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);

    for (idx, movie) in result
        .movies
        .iter()
        .enumerate()
        .skip(first_row * columns)
        .take(visible_rows * columns)
    {
        let row = (idx / columns - first_row) as u16;
        let col = (idx % columns) as u16;
        let card_area = Rect::new(
            inner.x + col * CARD_WIDTH,
            inner.y + row * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(inner);
        if card_area.is_empty() {
            continue;
        }
        render_card(movie, idx == selected, is_active, card_area, buf);
    }
}

fn render_message(message: &str, style: Style, area: Rect, buf: &mut Buffer) {
    let paragraph = Paragraph::new(Line::from(Span::styled(message, style)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    // Roughly vertically centered
    let offset = area.height / 2;
    let message_area = Rect {
        y: area.y + offset.saturating_sub(1),
        height: area.height - offset.saturating_sub(1),
        ..area
    };
    Widget::render(paragraph, message_area, buf);
}

/// Render a single movie card.
///
/// # Details
/// Card layout:
/// - Line 1: Title (bold)
/// - Line 2: Rating with one decimal and release year
/// - Remaining lines: Poster URL, wrapped
fn render_card(movie: &Movie, is_selected: bool, focused: bool, area: Rect, buf: &mut Buffer) {
    let border_style = match (is_selected, focused) {
        (true, true) => Style::default().fg(Color::Yellow),
        (true, false) => Style::default().fg(Color::Blue),
        _ => Style::default().fg(Color::DarkGray),
    };

    let title_style = Style::default()
        .fg(if is_selected {
            Color::Yellow
        } else {
            Color::White
        })
        .add_modifier(Modifier::BOLD);

    let mut rating_spans = vec![
        Span::styled("⭐ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} / 10", movie.format_rating()),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if let Some(year) = movie.release_year() {
        rating_spans.push(Span::styled(
            format!("  ({})", year),
            Style::default().fg(Color::Cyan),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(movie.title.as_str(), title_style)),
        Line::from(rating_spans),
        Line::from(Span::styled(
            movie.poster_url(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    Widget::render(paragraph, area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FetchOutcome;
    use crate::config::Config;
    use crate::recommend::{FetchError, ResultSet};
    use crate::ui::buffer_text;
    use reqwest::StatusCode;

    fn render(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        render_results(app, area, &mut buf);
        buffer_text(&buf)
    }

    fn app_with(result: Result<ResultSet, FetchError>) -> App {
        let mut app = App::new(&Config::default());
        let ticket = app.apply_filters();
        app.finish_fetch(FetchOutcome {
            seq: ticket.seq,
            result,
        });
        app
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(columns_for_width(10), 1);
        assert_eq!(columns_for_width(82), 2);
        assert_eq!(columns_for_width(125), 3);
    }

    #[test]
    fn test_render_cards() {
        let app = app_with(Ok(ResultSet::new(
            vec![
                Movie::new("Heat", 7.9, Some("/heat.jpg")),
                Movie::new("Ronin", 7.0, None),
            ],
            1,
            1,
        )));
        let text = render(&app, 90, 14);
        assert!(text.contains("Heat"));
        assert!(text.contains("7.9 / 10"));
        assert!(text.contains("Ronin"));
        assert!(text.contains("7.0 / 10"));
        assert!(text.contains("https://image.tmdb.org"));
        assert!(text.contains("https://via.placeholder.com"));
    }

    #[test]
    fn test_render_empty_result() {
        let app = app_with(Ok(ResultSet::new(vec![], 3, 1)));
        let text = render(&app, 90, 14);
        assert!(text.contains("No matching movies found."));
        assert!(!app.pager.is_empty());
    }

    #[test]
    fn test_render_failure() {
        let app = app_with(Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        let text = render(&app, 90, 14);
        assert!(text.contains("Error: Could not fetch recommendations."));
        assert!(!text.contains("Loading"));
    }

    #[test]
    fn test_render_loading() {
        let mut app = App::new(&Config::default());
        app.apply_filters();
        let text = render(&app, 90, 14);
        assert!(text.contains("Loading recommendations..."));
    }

    #[test]
    fn test_scrolls_to_selected_row() {
        let movies = (0..10)
            .map(|i| Movie::new(&format!("Film {:02}", i), 6.0, None))
            .collect();
        let mut app = app_with(Ok(ResultSet::new(movies, 1, 1)));
        // 2 columns, one visible row of cards
        app.selected_card = 9;
        let text = render(&app, 82, 8);
        assert!(text.contains("Film 08"));
        assert!(text.contains("Film 09"));
        assert!(!text.contains("Film 00"));
    }
}
