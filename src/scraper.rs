use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use uuid::Uuid;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetch::BoundedFetcher;
use crate::locate::locate;
use crate::model::{ExtractedRecipe, Recipe};
use crate::normalize::normalize;
use crate::resolve::resolve;
use crate::store::{UserId, UserStore};

/// Scrapes recipes into users' collections.
///
/// Every call is independent; the scraper holds no per-request state.
pub struct RecipeScraper {
    fetcher: BoundedFetcher,
    store: Arc<dyn UserStore>,
}

impl RecipeScraper {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use recipe_scrape::{MemoryStore, RecipeScraper};
    ///
    /// let scraper = RecipeScraper::builder()
    ///     .timeout(Duration::from_secs(2))
    ///     .build(Arc::new(MemoryStore::new()));
    /// assert!(scraper.is_ok());
    /// ```
    pub fn builder() -> RecipeScraperBuilder {
        RecipeScraperBuilder::default()
    }

    /// Scrapes `url`, stamps the record with its provenance and appends it to
    /// the collection of `user`.
    ///
    /// Exactly one recipe is appended on success; nothing is stored when any
    /// step fails.
    pub async fn extract(&self, url: &str, user: &UserId) -> Result<Recipe, ScrapeError> {
        let extracted = self.scrape(url).await?;

        let owner = self
            .store
            .find_user_by_id(user)
            .await?
            .ok_or_else(|| ScrapeError::UserNotFound(user.clone()))?;

        let recipe = Recipe {
            id: Uuid::new_v4(),
            extracted,
            url: url.to_string(),
            origin: owner.username,
            notes: Vec::new(),
        };

        self.store.append_recipe(user, recipe.clone()).await?;
        info!("Saved recipe {} from {} for user {}", recipe.id, url, user);
        Ok(recipe)
    }

    /// Runs the extraction pipeline without touching storage
    pub async fn scrape(&self, url: &str) -> Result<ExtractedRecipe, ScrapeError> {
        scrape_page(&self.fetcher, url).await
    }
}

pub(crate) async fn scrape_page(
    fetcher: &BoundedFetcher,
    url: &str,
) -> Result<ExtractedRecipe, ScrapeError> {
    let html = fetcher.fetch(url).await?;
    let tree = locate(&html)?;
    let node = resolve(&tree)?;
    debug!("Resolved recipe node for {}: {:#?}", url, node);
    Ok(normalize(node))
}

/// Builder for [`RecipeScraper`]
#[derive(Debug, Default)]
pub struct RecipeScraperBuilder {
    config: ScraperConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl RecipeScraperBuilder {
    /// Start from a loaded configuration
    pub fn config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the fetch deadline
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self, store: Arc<dyn UserStore>) -> Result<RecipeScraper, ScrapeError> {
        let timeout = self.timeout.unwrap_or_else(|| self.config.timeout());
        let user_agent = self.user_agent.unwrap_or(self.config.user_agent);

        let fetcher =
            BoundedFetcher::new(Some(timeout), &user_agent).map_err(ScrapeError::HttpClient)?;

        Ok(RecipeScraper { fetcher, store })
    }
}
