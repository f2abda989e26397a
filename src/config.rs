//! Configuration management for the movie picker.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages the server address, filter vocabularies, and defaults.

use crate::recommend::FilterSelection;
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const APP_DIR: &str = "movie-picker";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the recommendation service
    pub server_url: String,
    /// Timeout for a single recommendation request, in seconds
    pub request_timeout_secs: u64,
    /// Filter values applied on startup
    pub default_filters: FilterSelection,
    /// Genre choices offered in the filter form
    pub genres: Vec<String>,
    /// Mood choices offered in the filter form
    pub moods: Vec<String>,
    /// Sort choices offered in the filter form
    pub sort_options: Vec<SortOption>,
    /// Log file path (relative to config dir or absolute)
    pub log_file: String,
}

/// One entry of the sort-by control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    /// Value sent as `sort_by`
    pub value: String,
    /// Text shown in the form
    pub label: String,
}

impl SortOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            default_filters: FilterSelection::default(),
            genres: default_genres(),
            moods: default_moods(),
            sort_options: default_sort_options(),
            log_file: "movie-picker.log".to_string(),
        }
    }
}

fn default_genres() -> Vec<String> {
    [
        "Any",
        "Action",
        "Adventure",
        "Animation",
        "Comedy",
        "Crime",
        "Documentary",
        "Drama",
        "Family",
        "Fantasy",
        "History",
        "Horror",
        "Music",
        "Mystery",
        "Romance",
        "Science Fiction",
        "TV Movie",
        "Thriller",
        "War",
        "Western",
    ]
    .iter()
    .map(|g| g.to_string())
    .collect()
}

fn default_moods() -> Vec<String> {
    [
        "Any",
        "Happy",
        "Sad",
        "Romantic",
        "Excited",
        "Scared",
        "Thoughtful",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

fn default_sort_options() -> Vec<SortOption> {
    vec![
        SortOption::new("popularity.desc", "Most popular"),
        SortOption::new("vote_average.desc", "Highest rated"),
        SortOption::new("release_date.desc", "Newest"),
        SortOption::new("revenue.desc", "Highest grossing"),
    ]
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/movie-picker/config.jsonc`
    /// 3. `~/.config/movie-picker/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| "Failed to deserialize config")?;

        Ok(config)
    }

    /// Save configuration to file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Details
    /// Creates config directory if it doesn't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get default configuration file path.
    ///
    /// # Details
    /// Returns `$XDG_CONFIG_HOME/movie-picker/config.jsonc` or
    /// `~/.config/movie-picker/config.jsonc`.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(app_config_dir()?.join("config.jsonc"))
    }

    /// Get log file path.
    ///
    /// # Details
    /// If `log_file` is absolute, returns it as-is.
    /// Otherwise, returns path relative to the config directory.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        let log_path = Path::new(&self.log_file);
        if log_path.is_absolute() {
            Ok(log_path.to_path_buf())
        } else {
            Ok(app_config_dir()?.join(log_path))
        }
    }
}

fn app_config_dir() -> Result<PathBuf> {
    let config_dir =
        config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
    Ok(config_dir.join(APP_DIR))
}

/// Strip `//` line comments that are not inside a string literal.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut in_string = false;
            let mut escaped = false;
            let mut prev_slash = false;
            for (pos, ch) in line.char_indices() {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' if in_string => escaped = true,
                    '"' => in_string = !in_string,
                    '/' if !in_string && prev_slash => return line[..pos - 1].trim_end(),
                    _ => {}
                }
                prev_slash = ch == '/' && !in_string;
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
