//! Application state management.
//!
//! Owns the filter form, the applied filter selection, the page cursor, and
//! the results view. Every fetch-and-render cycle starts here and its outcome
//! comes back here.

use crate::config::{Config, SortOption};
use crate::pagination::{PageButton, PageWindow};
use crate::recommend::{
    FetchError, FilterSelection, Movie, RecommendRequest, RecommendationSource, ResultSet,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Region of the screen that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Filter form (genre, mood, sort)
    Filters,
    /// Movie card grid
    Results,
    /// Pager bar
    Pager,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Filters => Focus::Results,
            Focus::Results => Focus::Pager,
            Focus::Pager => Focus::Filters,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Filters => Focus::Pager,
            Focus::Results => Focus::Filters,
            Focus::Pager => Focus::Results,
        }
    }
}

/// One control of the filter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Genre,
    Mood,
    SortBy,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Genre, FilterField::Mood, FilterField::SortBy];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Genre => "Genre",
            FilterField::Mood => "Mood",
            FilterField::SortBy => "Sort by",
        }
    }
}

/// The three selectable controls and what they currently hold.
#[derive(Debug, Clone)]
pub struct FilterForm {
    genres: Vec<String>,
    moods: Vec<String>,
    sort_options: Vec<SortOption>,
    genre_index: usize,
    mood_index: usize,
    sort_index: usize,
    /// Control the cursor is on
    pub field: FilterField,
}

impl FilterForm {
    /// Build the form from configured choices, preselecting the defaults.
    ///
    /// # Details
    /// A default that is not among the choices is added to them so the
    /// first request carries exactly what was configured.
    pub fn from_config(config: &Config) -> Self {
        let mut genres = config.genres.clone();
        let mut moods = config.moods.clone();
        let mut sort_options = config.sort_options.clone();
        let defaults = &config.default_filters;

        let genre_index = position_or_insert(&mut genres, &defaults.genre);
        let mood_index = position_or_insert(&mut moods, &defaults.mood);
        let sort_index = match sort_options.iter().position(|o| o.value == defaults.sort_by) {
            Some(index) => index,
            None => {
                sort_options.push(SortOption {
                    value: defaults.sort_by.clone(),
                    label: defaults.sort_by.clone(),
                });
                sort_options.len() - 1
            }
        };

        Self {
            genres,
            moods,
            sort_options,
            genre_index,
            mood_index,
            sort_index,
            field: FilterField::Genre,
        }
    }

    /// Current values of all three controls.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            genre: self.genres[self.genre_index].clone(),
            mood: self.moods[self.mood_index].clone(),
            sort_by: self.sort_options[self.sort_index].value.clone(),
        }
    }

    /// Text shown for a control's current value.
    pub fn display_value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Genre => &self.genres[self.genre_index],
            FilterField::Mood => &self.moods[self.mood_index],
            FilterField::SortBy => &self.sort_options[self.sort_index].label,
        }
    }

    /// Move the cursor to the next control, wrapping.
    pub fn next_field(&mut self) {
        self.field = match self.field {
            FilterField::Genre => FilterField::Mood,
            FilterField::Mood => FilterField::SortBy,
            FilterField::SortBy => FilterField::Genre,
        };
    }

    /// Move the cursor to the previous control, wrapping.
    pub fn prev_field(&mut self) {
        self.field = match self.field {
            FilterField::Genre => FilterField::SortBy,
            FilterField::Mood => FilterField::Genre,
            FilterField::SortBy => FilterField::Mood,
        };
    }

    /// Step the focused control's value forward or backward, wrapping.
    pub fn cycle_value(&mut self, forward: bool) {
        let (index, len) = match self.field {
            FilterField::Genre => (&mut self.genre_index, self.genres.len()),
            FilterField::Mood => (&mut self.mood_index, self.moods.len()),
            FilterField::SortBy => (&mut self.sort_index, self.sort_options.len()),
        };
        *index = if forward {
            (*index + 1) % len
        } else if *index == 0 {
            len - 1
        } else {
            *index - 1
        };
    }
}

fn position_or_insert(items: &mut Vec<String>, wanted: &str) -> usize {
    match items.iter().position(|item| item == wanted) {
        Some(index) => index,
        None => {
            items.push(wanted.to_string());
            items.len() - 1
        }
    }
}

/// What the results area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    /// Nothing requested yet
    Idle,
    /// Request in flight; results and pager are cleared
    Loading,
    /// Latest response
    Loaded(ResultSet),
    /// Latest request failed; holds the user-facing message
    Failed(String),
}

/// A fetch that has been started and must be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Sequence number of this cycle
    pub seq: u64,
    pub request: RecommendRequest,
}

/// Result of a fetch, tagged with the cycle that produced it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<ResultSet, FetchError>,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Filter form controls
    pub form: FilterForm,
    /// Filter selection sent with every request
    pub applied: FilterSelection,
    /// Page cursor (1-based)
    pub current_page: u32,
    /// Results area state
    pub view: ResultsView,
    /// Pager for the live result set
    pub pager: PageWindow,
    /// Region receiving keyboard input
    pub focus: Focus,
    /// Highlighted card index
    pub selected_card: usize,
    /// Highlighted pager button index
    pub pager_index: usize,
    /// Cards per grid row, as last laid out
    pub grid_columns: usize,
    /// Status message to display
    pub status_message: Option<String>,
    /// Sequence number of the most recently started cycle
    latest_seq: u64,
}

impl App {
    /// Create a new application state.
    ///
    /// # Arguments
    /// * `config` - Configuration providing filter choices and defaults
    pub fn new(config: &Config) -> Self {
        let form = FilterForm::from_config(config);
        let applied = form.selection();
        Self {
            form,
            applied,
            current_page: 1,
            view: ResultsView::Idle,
            pager: PageWindow::default(),
            focus: Focus::Filters,
            selected_card: 0,
            pager_index: 0,
            grid_columns: 1,
            status_message: None,
            latest_seq: 0,
        }
    }

    /// Read the filter form, reset to page 1, and start a fetch.
    pub fn apply_filters(&mut self) -> FetchTicket {
        self.current_page = 1;
        self.applied = self.form.selection();
        info!(filters = ?self.applied, "applying filters");
        self.begin_fetch()
    }

    /// Jump to `page` and start a fetch, scrolling back to the first card.
    ///
    /// # Details
    /// `page` is expected to be the target of a button from the current
    /// pager; it is not checked against the page count.
    pub fn go_to_page(&mut self, page: u32) -> FetchTicket {
        if !self.pager.offers(page) {
            debug!(page, "going to a page the pager does not offer");
        }
        self.current_page = page.max(1);
        self.begin_fetch()
    }

    /// Start a fetch-and-render cycle for the applied filters and page.
    ///
    /// # Details
    /// Switches the results area to loading and clears the pager. The
    /// returned ticket carries the sequence number the outcome must echo.
    fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.view = ResultsView::Loading;
        self.pager = PageWindow::default();
        self.pager_index = 0;
        self.selected_card = 0;
        self.set_status(format!("Loading page {}...", self.current_page));
        FetchTicket {
            seq: self.latest_seq,
            request: RecommendRequest::new(self.applied.clone(), self.current_page),
        }
    }

    /// Apply the outcome of a fetch.
    ///
    /// # Returns
    /// * `bool` - False if the outcome was stale and discarded
    ///
    /// # Details
    /// Only the most recently started cycle may render; older outcomes are
    /// dropped. Loading always ends for the latest cycle, success or not.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "discarding stale response"
            );
            return false;
        }

        match outcome.result {
            Ok(result) => {
                self.pager = PageWindow::compute(result.total_pages, result.current_page);
                self.pager_index = self.pager.active_index().unwrap_or(0);
                info!(
                    movies = result.movies.len(),
                    page = result.current_page,
                    total_pages = result.total_pages,
                    "recommendations loaded"
                );
                debug!(buttons = ?self.pager.numbers(), "pager window");
                self.set_status(format!(
                    "Page {} of {} - {} movies",
                    result.current_page,
                    result.total_pages,
                    result.movies.len()
                ));
                self.view = ResultsView::Loaded(result);
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch recommendations");
                self.pager = PageWindow::default();
                self.pager_index = 0;
                self.view = ResultsView::Failed(e.user_message().to_string());
                self.set_status(format!("Fetch failed: {}", e));
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.view == ResultsView::Loading
    }

    /// Movies of the live result set (empty unless loaded).
    pub fn movies(&self) -> &[Movie] {
        match &self.view {
            ResultsView::Loaded(result) => &result.movies,
            _ => &[],
        }
    }

    /// Currently highlighted movie.
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies().get(self.selected_card)
    }

    /// Move the card highlight by `delta` cards, clamped to the grid.
    pub fn move_card(&mut self, delta: isize) {
        let count = self.movies().len();
        if count == 0 {
            return;
        }
        let target = self.selected_card as isize + delta;
        self.selected_card = target.clamp(0, count as isize - 1) as usize;
    }

    /// Move the card highlight one grid row up or down.
    pub fn move_card_row(&mut self, down: bool) {
        let step = self.grid_columns.max(1) as isize;
        self.move_card(if down { step } else { -step });
    }

    /// Cycle keyboard focus.
    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = if forward {
            self.focus.next()
        } else {
            self.focus.prev()
        };
    }

    /// Move the pager highlight left or right, clamped.
    pub fn move_pager(&mut self, right: bool) {
        if self.pager.is_empty() {
            return;
        }
        let last = self.pager.buttons().len() - 1;
        self.pager_index = if right {
            (self.pager_index + 1).min(last)
        } else {
            self.pager_index.saturating_sub(1)
        };
    }

    /// Highlighted pager button.
    pub fn selected_page_button(&self) -> Option<&PageButton> {
        self.pager.buttons().get(self.pager_index)
    }

    /// Activate the highlighted pager button.
    pub fn activate_pager(&mut self) -> Option<FetchTicket> {
        let target = self.selected_page_button()?.target;
        Some(self.go_to_page(target))
    }

    /// Follow the Next button, if the pager offers one.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let target = self.pager.next()?.target;
        Some(self.go_to_page(target))
    }

    /// Follow the Prev button, if the pager offers one.
    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        let target = self.pager.prev()?.target;
        Some(self.go_to_page(target))
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

/// Run a fetch in the background and report its outcome on `tx`.
///
/// # Details
/// The task never touches UI state; the event loop feeds the outcome back
/// through [`App::finish_fetch`].
pub fn spawn_fetch(
    source: Arc<dyn RecommendationSource>,
    ticket: FetchTicket,
    tx: UnboundedSender<FetchOutcome>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let FetchTicket { seq, request } = ticket;
        let result = source.recommend(request).await;
        // Receiver is gone only when the app is shutting down.
        let _ = tx.send(FetchOutcome { seq, result });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    fn movie(title: &str) -> Movie {
        Movie::new(title, 7.5, Some("/poster.jpg"))
    }

    fn loaded(app: &mut App, seq: u64, result: ResultSet) -> bool {
        app.finish_fetch(FetchOutcome {
            seq,
            result: Ok(result),
        })
    }

    /// In-memory source that records requests and replays a fixed response.
    struct FakeSource {
        requests: Mutex<Vec<RecommendRequest>>,
        respond: fn(&RecommendRequest) -> Result<ResultSet, FetchError>,
    }

    #[async_trait]
    impl RecommendationSource for FakeSource {
        async fn recommend(&self, request: RecommendRequest) -> Result<ResultSet, FetchError> {
            let response = (self.respond)(&request);
            self.requests.lock().unwrap().push(request);
            response
        }
    }

    #[test]
    fn test_app_new() {
        let app = App::new(&Config::default());
        assert_eq!(app.current_page, 1);
        assert_eq!(app.view, ResultsView::Idle);
        assert_eq!(app.focus, Focus::Filters);
        assert_eq!(app.applied, FilterSelection::default());
        assert!(app.pager.is_empty());
    }

    #[test]
    fn test_form_cycles_values() {
        let mut app = App::new(&Config::default());
        app.form.field = FilterField::Mood;
        app.form.cycle_value(true);
        assert_eq!(app.form.display_value(FilterField::Mood), "Happy");
        app.form.cycle_value(false);
        app.form.cycle_value(false);
        assert_eq!(app.form.display_value(FilterField::Mood), "Thoughtful");

        app.form.next_field();
        assert_eq!(app.form.field, FilterField::SortBy);
        app.form.cycle_value(true);
        assert_eq!(app.form.selection().sort_by, "vote_average.desc");
        assert_eq!(app.form.display_value(FilterField::SortBy), "Highest rated");
    }

    #[test]
    fn test_form_adds_unknown_default() {
        let config = Config {
            default_filters: FilterSelection {
                genre: "Noir".to_string(),
                mood: "Any".to_string(),
                sort_by: "original_title.asc".to_string(),
            },
            ..Config::default()
        };
        let form = FilterForm::from_config(&config);
        let selection = form.selection();
        assert_eq!(selection.genre, "Noir");
        assert_eq!(selection.sort_by, "original_title.asc");
    }

    #[test]
    fn test_apply_filters_resets_page() {
        let mut app = App::new(&Config::default());
        app.go_to_page(7);
        assert_eq!(app.current_page, 7);

        app.form.cycle_value(true);
        let ticket = app.apply_filters();
        assert_eq!(app.current_page, 1);
        assert_eq!(ticket.request.page, 1);
        assert_eq!(ticket.request.filters.genre, "Action");
        assert_eq!(app.applied.genre, "Action");
        assert!(app.is_loading());
    }

    #[test]
    fn test_form_edits_do_not_change_applied_until_applied() {
        let mut app = App::new(&Config::default());
        app.apply_filters();
        app.form.cycle_value(true);
        let ticket = app.go_to_page(2);
        assert_eq!(ticket.request.filters.genre, "Any");
    }

    #[test]
    fn test_begin_fetch_clears_results_and_pager() {
        let mut app = App::new(&Config::default());
        let ticket = app.apply_filters();
        loaded(&mut app, ticket.seq, ResultSet::new(vec![movie("A")], 10, 1));
        assert!(!app.pager.is_empty());

        app.next_page().unwrap();
        assert!(app.is_loading());
        assert!(app.pager.is_empty());
        assert!(app.movies().is_empty());
    }

    #[test]
    fn test_loaded_result_renders_pager_from_response() {
        let mut app = App::new(&Config::default());
        let ticket = app.go_to_page(3);
        assert!(loaded(&mut app, ticket.seq, ResultSet::new(vec![], 10, 3)));
        assert!(!app.is_loading());
        assert!(app.movies().is_empty());
        assert_eq!(app.pager.numbers(), vec![1, 2, 3, 4, 5]);
        assert_eq!(app.selected_page_button().unwrap().target, 3);
    }

    #[test]
    fn test_failed_fetch_shows_error_without_pager() {
        let mut app = App::new(&Config::default());
        let ticket = app.apply_filters();
        let applied = app.finish_fetch(FetchOutcome {
            seq: ticket.seq,
            result: Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
        });
        assert!(applied);
        assert!(!app.is_loading());
        assert_eq!(
            app.view,
            ResultsView::Failed("Error: Could not fetch recommendations.".to_string())
        );
        assert!(app.pager.is_empty());
        assert!(app.movies().is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut app = App::new(&Config::default());
        let first = app.apply_filters();
        let second = app.go_to_page(2);

        // Latest request resolves first, the older one afterwards.
        assert!(loaded(&mut app, second.seq, ResultSet::new(vec![movie("Two")], 5, 2)));
        assert!(!loaded(&mut app, first.seq, ResultSet::new(vec![movie("One")], 5, 1)));

        assert_eq!(app.movies()[0].title, "Two");
        assert_eq!(app.current_page, 2);
    }

    #[test]
    fn test_go_to_page_scrolls_to_top() {
        let mut app = App::new(&Config::default());
        app.grid_columns = 2;
        let ticket = app.apply_filters();
        let movies = (0..6).map(|i| movie(&format!("M{}", i))).collect();
        loaded(&mut app, ticket.seq, ResultSet::new(movies, 3, 1));

        app.move_card_row(true);
        app.move_card(1);
        assert_eq!(app.selected_card, 3);

        app.next_page().unwrap();
        assert_eq!(app.selected_card, 0);
        assert_eq!(app.current_page, 2);
    }

    #[test]
    fn test_card_navigation_clamps() {
        let mut app = App::new(&Config::default());
        app.grid_columns = 4;
        let ticket = app.apply_filters();
        let movies = (0..6).map(|i| movie(&format!("M{}", i))).collect();
        loaded(&mut app, ticket.seq, ResultSet::new(movies, 1, 1));

        app.move_card(-1);
        assert_eq!(app.selected_card, 0);
        app.move_card_row(true);
        assert_eq!(app.selected_card, 4);
        app.move_card_row(true);
        assert_eq!(app.selected_card, 5);
        assert_eq!(app.selected_movie().unwrap().title, "M5");
    }

    #[test]
    fn test_prev_next_only_when_offered() {
        let mut app = App::new(&Config::default());
        let ticket = app.apply_filters();
        loaded(&mut app, ticket.seq, ResultSet::new(vec![movie("A")], 10, 1));
        assert!(app.prev_page().is_none());

        let ticket = app.next_page().unwrap();
        assert_eq!(ticket.request.page, 2);
        loaded(&mut app, ticket.seq, ResultSet::new(vec![movie("B")], 10, 2));
        let ticket = app.prev_page().unwrap();
        assert_eq!(ticket.request.page, 1);
    }

    #[test]
    fn test_pager_activation() {
        let mut app = App::new(&Config::default());
        let ticket = app.apply_filters();
        loaded(&mut app, ticket.seq, ResultSet::new(vec![movie("A")], 10, 1));
        // Buttons: 1 2 3 4 5 Next, highlight starts on the active page
        assert_eq!(app.pager_index, 0);
        app.move_pager(true);
        app.move_pager(true);
        let ticket = app.activate_pager().unwrap();
        assert_eq!(ticket.request.page, 3);
    }

    #[test]
    fn test_move_pager_without_buttons() {
        let mut app = App::new(&Config::default());
        let ticket = app.apply_filters();
        loaded(&mut app, ticket.seq, ResultSet::new(vec![movie("A")], 1, 1));
        assert!(app.pager.is_empty());
        app.move_pager(true);
        assert_eq!(app.pager_index, 0);
        assert!(app.activate_pager().is_none());
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = App::new(&Config::default());
        app.cycle_focus(true);
        assert_eq!(app.focus, Focus::Results);
        app.cycle_focus(true);
        assert_eq!(app.focus, Focus::Pager);
        app.cycle_focus(true);
        assert_eq!(app.focus, Focus::Filters);
        app.cycle_focus(false);
        assert_eq!(app.focus, Focus::Pager);
    }

    #[tokio::test]
    async fn test_spawn_fetch_round_trip() {
        let source = Arc::new(FakeSource {
            requests: Mutex::new(Vec::new()),
            respond: |request| {
                Ok(ResultSet::new(
                    vec![Movie::new("Arrival", 7.6, None)],
                    4,
                    request.page,
                ))
            },
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default());

        let ticket = app.apply_filters();
        spawn_fetch(source.clone(), ticket, tx).await.unwrap();
        let outcome = rx.recv().await.unwrap();
        assert!(app.finish_fetch(outcome));

        assert_eq!(app.movies()[0].title, "Arrival");
        assert_eq!(app.pager.numbers(), vec![1, 2, 3, 4]);
        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, 1);
        assert_eq!(requests[0].filters, FilterSelection::default());
    }

    #[tokio::test]
    async fn test_spawn_fetch_failure_ends_loading() {
        let source = Arc::new(FakeSource {
            requests: Mutex::new(Vec::new()),
            respond: |_| Err(FetchError::Status(StatusCode::BAD_GATEWAY)),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default());

        let ticket = app.apply_filters();
        assert!(app.is_loading());
        spawn_fetch(source, ticket, tx).await.unwrap();
        app.finish_fetch(rx.recv().await.unwrap());

        assert!(!app.is_loading());
        assert!(matches!(app.view, ResultsView::Failed(_)));
        assert!(app.status_message.as_deref().unwrap().contains("502"));
    }
}
