//! Extracts schema.org recipes embedded in web pages as JSON-LD and
//! normalizes them into one canonical record.
//!
//! The pipeline runs fetch, locate, resolve and normalize in order. [`RecipeScraper`]
//! adds provenance and saves the result to a user's collection.

pub mod config;
pub mod error;
pub mod fetch;
pub mod locate;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod scraper;
pub mod session;
pub mod store;

pub use config::ScraperConfig;
pub use error::{FetchError, ScrapeError};
pub use fetch::BoundedFetcher;
pub use model::{ExtractedRecipe, Note, Recipe};
pub use scraper::{RecipeScraper, RecipeScraperBuilder};
pub use session::{MemorySessionStore, SessionStore};
pub use store::{MemoryStore, RecipeEdit, StoreError, User, UserId, UserStore};

use crate::fetch::DEFAULT_USER_AGENT;

/// Scrape a recipe from `url` with the default deadline, without saving it
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), recipe_scrape::ScrapeError> {
/// let recipe = recipe_scrape::scrape_url("https://example.com/waffles").await?;
/// println!("{:?}", recipe.recipe_ingredient);
/// # Ok(())
/// # }
/// ```
pub async fn scrape_url(url: &str) -> Result<ExtractedRecipe, ScrapeError> {
    let fetcher = BoundedFetcher::new(None, DEFAULT_USER_AGENT).map_err(ScrapeError::HttpClient)?;
    scraper::scrape_page(&fetcher, url).await
}
