//! Recommendation service wire types.
//!
//! Contains the request body sent to `/recommend`, the movie records and
//! page metadata it returns, and the card formatting helpers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Base URL for poster images on the TMDB image CDN.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Image shown for movies without a poster.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// User-chosen genre/mood/sort criteria sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    /// Genre name, or "Any"
    pub genre: String,
    /// Mood name, or "Any"
    pub mood: String,
    /// TMDB sort key (e.g. `popularity.desc`)
    pub sort_by: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            genre: "Any".to_string(),
            mood: "Any".to_string(),
            sort_by: "popularity.desc".to_string(),
        }
    }
}

/// Body of `POST /recommend`: the filter selection flattened with the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub filters: FilterSelection,
    pub page: u32,
}

impl RecommendRequest {
    pub fn new(filters: FilterSelection, page: u32) -> Self {
        Self { filters, page }
    }
}

/// A single movie as returned by the recommendation service.
///
/// The service passes TMDB discover results through untouched, so anything
/// besides the fields below is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Movie {
    /// Create a movie with just the fields a card needs.
    ///
    /// # Arguments
    /// * `title` - Movie title
    /// * `vote_average` - Average rating out of 10
    /// * `poster_path` - TMDB poster path (e.g. `/abc.jpg`)
    #[cfg(test)]
    pub fn new(title: &str, vote_average: f64, poster_path: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            vote_average,
            poster_path: poster_path.map(str::to_string),
            release_date: None,
            overview: None,
        }
    }

    /// Full poster URL for this movie.
    ///
    /// # Returns
    /// * `String` - CDN URL, or the placeholder image if there is no poster
    pub fn poster_url(&self) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", POSTER_BASE_URL, path),
            _ => PLACEHOLDER_POSTER_URL.to_string(),
        }
    }

    /// Rating with exactly one decimal place.
    pub fn format_rating(&self) -> String {
        format_rating(self.vote_average)
    }

    /// Release year taken from `release_date` (`YYYY-MM-DD`).
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Format a vote average as `7.0`, `8.3`, ...
///
/// Rounds the exact stored value, so `6.35` (stored as 6.3499...) renders as
/// `6.3`. Exact ties such as `8.25` round away from zero.
pub fn format_rating(vote_average: f64) -> String {
    // Only x.25 and x.75 can sit exactly on a hundredths tie.
    let quarters = vote_average * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        let tenths = (vote_average * 10.0).round();
        return format!("{:.1}", tenths / 10.0);
    }
    format!("{:.1}", vote_average)
}

fn default_total_pages() -> u32 {
    1
}

/// One server response: the movies for a page plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    pub current_page: u32,
    /// When the response arrived (client side only)
    #[serde(skip, default = "Local::now")]
    pub fetched_at: DateTime<Local>,
}

impl ResultSet {
    #[cfg(test)]
    pub fn new(movies: Vec<Movie>, total_pages: u32, current_page: u32) -> Self {
        Self {
            movies,
            total_pages,
            current_page,
            fetched_at: Local::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
