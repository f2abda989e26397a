//! Recommendation service integration module.
//!
//! Provides the client for `POST /recommend` and the movie/result types it
//! exchanges.

pub mod client;
pub mod error;
pub mod models;

pub use client::{RecommendClient, RecommendationSource};
pub use error::FetchError;
pub use models::{FilterSelection, Movie, RecommendRequest, ResultSet};
