// src/services/fetcher.rs

//! Listing-page fetch service.
//!
//! [`PageFetcher`] is the network seam: the watcher depends on this
//! contract, not on reqwest, so tests can script pages without a server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;

use crate::error::Result;
use crate::models::HttpConfig;

/// Fetches the raw HTML of a listing page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Perform a single GET and return the response body.
    ///
    /// One attempt only; the next scheduled poll is the retry policy.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP-backed page fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a configured HTTP client.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "*/*")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;

    #[test]
    fn builds_client_from_config() {
        assert!(HttpFetcher::new(&HttpConfig::default()).is_ok());
    }
}
