use std::time::Duration;

use thiserror::Error;

use crate::store::{StoreError, UserId};

/// Reasons a page could not be retrieved
#[derive(Error, Debug)]
pub enum FetchError {
    /// The deadline elapsed before the page body arrived
    #[error("Timed out after {0:?} fetching URL")]
    Timeout(Duration),

    /// The request failed or the server answered with a non-success status
    #[error("Failed to fetch URL: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors that can occur while scraping a recipe
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page carries no embedded JSON-LD block
    #[error("No structured recipe data found on this page")]
    NoStructuredData,

    /// The JSON-LD block exists but is not valid JSON
    #[error("Structured data on this page could not be parsed: {0}")]
    MalformedStructuredData(#[from] serde_json::Error),

    /// The JSON-LD block holds nothing with an ingredient list
    #[error("No recipe found in the structured data on this page")]
    NoRecipeFound,

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Saving the scraped recipe failed
    #[error("Failed to save recipe: {0}")]
    Persistence(#[from] StoreError),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ScrapeError {
    /// Whether the failure is attributable to the request (bad page, unknown
    /// user) rather than to this service.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ScrapeError::Persistence(_) | ScrapeError::HttpClient(_) | ScrapeError::Config(_)
        )
    }
}
