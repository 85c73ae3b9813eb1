use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::error::FetchError;

/// Deadline applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; RecipeScrapeBot/1.0)";

/// Retrieves page HTML, giving up once a fixed deadline has passed.
///
/// The request and the body download race the deadline together. When the
/// deadline wins, the request future is dropped, which closes its connection.
pub struct BoundedFetcher {
    client: Client,
    timeout: Duration,
}

impl BoundedFetcher {
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("BoundedFetcher: GET {} (deadline {:?})", url, self.timeout);

        match tokio::time::timeout(self.timeout, self.request(url)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("BoundedFetcher: {} did not answer within {:?}", url, self.timeout);
                Err(FetchError::Timeout(self.timeout))
            }
        }
    }

    async fn request(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        debug!("BoundedFetcher: received {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
