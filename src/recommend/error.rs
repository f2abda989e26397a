//! Failure taxonomy for a fetch-and-render cycle.

use reqwest::StatusCode;

/// Message shown in the results area for every kind of fetch failure.
pub const FETCH_ERROR_MESSAGE: &str = "Error: Could not fetch recommendations.";

/// Why a recommendation request failed.
///
/// All variants are shown to the user as [`FETCH_ERROR_MESSAGE`]; the cause
/// only goes to the log and the status bar.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    /// The user-facing text for this failure.
    pub fn user_message(&self) -> &'static str {
        FETCH_ERROR_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_collapses_to_generic_message() {
        let err = FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), FETCH_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "server returned 500 Internal Server Error");
    }
}
