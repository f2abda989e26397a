//! Movie Picker - Terminal User Interface for browsing movie recommendations.
//!
//! Main entry point and event loop for the application.

mod app;
mod config;
mod logging;
mod pagination;
mod recommend;
mod ui;

use app::{App, FetchOutcome, FetchTicket, Focus, spawn_fetch};
use clap::Parser;
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use recommend::{RecommendClient, RecommendationSource};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};
use ui::ScreenLayout;

/// Command line arguments. Anything given here overrides the config file.
#[derive(Parser, Debug)]
#[command(name = "movie-picker")]
#[command(about = "Browse movie recommendations by genre, mood and sort order", long_about = None)]
struct Args {
    /// Path to config.jsonc
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Base URL of the recommendation service
    #[arg(short, long)]
    server: Option<String>,
    /// Genre selected on startup
    #[arg(long)]
    genre: Option<String>,
    /// Mood selected on startup
    #[arg(long)]
    mood: Option<String>,
    /// Sort order selected on startup (e.g. vote_average.desc)
    #[arg(long)]
    sort_by: Option<String>,
    /// Write logs here instead of the config directory
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Save the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(genre) = &self.genre {
            config.default_filters.genre = genre.clone();
        }
        if let Some(mood) = &self.mood {
            config.default_filters.mood = mood.clone();
        }
        if let Some(sort_by) = &self.sort_by {
            config.default_filters.sort_by = sort_by.clone();
        }
        if let Some(log_file) = &self.log_file {
            // Relative paths are taken from the working directory, not the config dir
            let log_file = std::path::absolute(log_file).unwrap_or_else(|_| log_file.clone());
            config.log_file = log_file.to_string_lossy().into_owned();
        }
    }
}

/// What the event loop should do after handling an input event.
#[derive(Debug, PartialEq)]
enum Action {
    None,
    Quit,
    Fetch(FetchTicket),
}

impl From<Option<FetchTicket>> for Action {
    fn from(ticket: Option<FetchTicket>) -> Self {
        ticket.map_or(Action::None, Action::Fetch)
    }
}

/// Main application entry point.
///
/// # Details
/// Loads configuration, sets up logging and the terminal, and runs the
/// event loop. The terminal is restored even if the loop fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    if args.write_config {
        config.save(args.config.as_deref())?;
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Config::default_config_path()?,
        };
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    logging::init(&config.log_file_path()?)?;

    let client = RecommendClient::new(&config)?;
    info!(endpoint = %client.endpoint(), "starting movie picker");
    let source: Arc<dyn RecommendationSource> = Arc::new(client);

    let mut app = App::new(&config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, source).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
/// * `source` - Where recommendations come from
///
/// # Details
/// Applies the default filters once on startup, then alternates between
/// draining finished fetches, redrawing, and handling input. Fetches run on
/// spawned tasks so the UI stays responsive while a request is in flight.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    source: Arc<dyn RecommendationSource>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut layout = ScreenLayout::default();

    start_fetch(&source, app.apply_filters(), &tx);

    loop {
        while let Ok(outcome) = rx.try_recv() {
            app.finish_fetch(outcome);
        }

        terminal.draw(|f| {
            layout = ui::render(f, app);
        })?;
        app.grid_columns = ui::grid::columns_for_width(layout.results.width);

        // Use non-blocking event polling with timeout to keep UI responsive
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, app),
            Event::Mouse(mouse) => handle_mouse(mouse, app, &layout),
            _ => Action::None,
        };

        match action {
            Action::Quit => break,
            Action::Fetch(ticket) => start_fetch(&source, ticket, &tx),
            Action::None => {}
        }
    }

    info!("shutting down");
    Ok(())
}

fn start_fetch(
    source: &Arc<dyn RecommendationSource>,
    ticket: FetchTicket,
    tx: &UnboundedSender<FetchOutcome>,
) {
    info!(seq = ticket.seq, page = ticket.request.page, "starting fetch");
    spawn_fetch(Arc::clone(source), ticket, tx.clone());
}

/// Handle a key press.
///
/// # Details
/// Quit, focus and page keys work everywhere; the arrow keys and Enter
/// act on whichever region has focus.
fn handle_key(key: KeyEvent, app: &mut App) -> Action {
    debug!(code = ?key.code, focus = ?app.focus, "key");

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Tab => {
            app.cycle_focus(true);
            return Action::None;
        }
        KeyCode::BackTab => {
            app.cycle_focus(false);
            return Action::None;
        }
        KeyCode::Char('n') | KeyCode::Char(']') => return app.next_page().into(),
        KeyCode::Char('p') | KeyCode::Char('[') => return app.prev_page().into(),
        KeyCode::Char('r') => return Action::Fetch(app.apply_filters()),
        _ => {}
    }

    match app.focus {
        Focus::Filters => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.form.prev_field(),
            KeyCode::Down | KeyCode::Char('j') => app.form.next_field(),
            KeyCode::Left | KeyCode::Char('h') => app.form.cycle_value(false),
            KeyCode::Right | KeyCode::Char('l') => app.form.cycle_value(true),
            KeyCode::Enter => return Action::Fetch(app.apply_filters()),
            _ => {}
        },
        Focus::Results => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.move_card(-1),
            KeyCode::Right | KeyCode::Char('l') => app.move_card(1),
            KeyCode::Up | KeyCode::Char('k') => app.move_card_row(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_card_row(true),
            KeyCode::Enter => {
                if let Some(movie) = app.selected_movie() {
                    let overview = movie
                        .overview
                        .as_deref()
                        .filter(|o| !o.is_empty())
                        .unwrap_or("No overview");
                    let status = format!(
                        "{} - {} - poster: {}",
                        movie.title,
                        overview,
                        movie.poster_url()
                    );
                    app.set_status(status);
                }
            }
            _ => {}
        },
        Focus::Pager => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.move_pager(false),
            KeyCode::Right | KeyCode::Char('l') => app.move_pager(true),
            KeyCode::Enter => return app.activate_pager().into(),
            _ => {}
        },
    }

    Action::None
}

/// Handle mouse events (scroll and click).
///
/// # Details
/// Scrolling moves through the card grid. A left click on a pager button
/// goes to that page; a click on a filter control focuses it.
fn handle_mouse(mouse: MouseEvent, app: &mut App, layout: &ScreenLayout) -> Action {
    let inside = |area: ratatui::layout::Rect| {
        mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height
    };

    match mouse.kind {
        MouseEventKind::ScrollUp if inside(layout.results) => app.move_card_row(false),
        MouseEventKind::ScrollDown if inside(layout.results) => app.move_card_row(true),
        MouseEventKind::Down(MouseButton::Left) => {
            if inside(layout.pager) {
                app.focus = Focus::Pager;
                if let Some(button) =
                    ui::pager::button_at(app, layout.pager, mouse.column, mouse.row)
                {
                    return Action::Fetch(app.go_to_page(button.target));
                }
            } else if inside(layout.filters) {
                app.focus = Focus::Filters;
                if let Some(field) = ui::filters::field_at(layout.filters, mouse.row) {
                    app.form.field = field;
                }
            } else if inside(layout.results) {
                app.focus = Focus::Results;
            }
        }
        _ => {}
    }

    Action::None
}
