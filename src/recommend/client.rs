//! HTTP client for the recommendation service.
//!
//! Sends the filter selection and page to `POST /recommend` and decodes the
//! returned page of movies.

use crate::config::Config;
use crate::recommend::error::FetchError;
use crate::recommend::models::{RecommendRequest, ResultSet};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

/// Anything that can answer a recommendation request.
///
/// The UI talks to this trait so the fetch cycle can run against the real
/// service or an in-memory source.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetch one page of recommendations.
    async fn recommend(&self, request: RecommendRequest) -> Result<ResultSet, FetchError>;
}

/// Recommendation service client.
#[derive(Debug, Clone)]
pub struct RecommendClient {
    /// HTTP client for API requests
    client: Client,
    /// Full URL of the `/recommend` endpoint
    endpoint: Url,
}

impl RecommendClient {
    /// Create a new client from configuration.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Returns
    /// * `Result<RecommendClient>` - New client or error
    ///
    /// # Details
    /// Requires a valid `server_url`. The request timeout comes from
    /// `request_timeout_secs`.
    pub fn new(config: &Config) -> Result<Self> {
        if config.server_url.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Recommendation server URL is required. Please set it in config.jsonc"
            ));
        }

        let endpoint = Url::parse(&format!(
            "{}/recommend",
            config.server_url.trim().trim_end_matches('/')
        ))
        .with_context(|| format!("Invalid server URL: {}", config.server_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RecommendationSource for RecommendClient {
    /// Fetch recommended movies for a filter selection and page.
    ///
    /// # Details
    /// Any non-success status is a failure regardless of the body. A body
    /// that is not a valid result set is a failure too.
    #[instrument(skip(self), fields(page = request.page))]
    async fn recommend(&self, request: RecommendRequest) -> Result<ResultSet, FetchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let result: ResultSet = response.json().await.map_err(FetchError::Decode)?;
        debug!(
            movies = result.movies.len(),
            total_pages = result.total_pages,
            "decoded recommendations"
        );
        Ok(result)
    }
}
