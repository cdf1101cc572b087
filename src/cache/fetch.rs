//! Network access for icon collections.
//!
//! The cache manager only needs "give me the body at this URL"; the
//! [`IconSetFetcher`] trait is that seam. [`HttpFetcher`] is the `reqwest`
//! implementation used in production, tests substitute counting or failing
//! fetchers.

use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::time::Duration;

use crate::constants::FETCH_TIMEOUT;
use crate::core::IconlensError;

/// Downloads raw collection documents.
pub trait IconSetFetcher: Send + Sync {
    /// Fetches the body at `url` as text.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// HTTP fetcher backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Creates a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("iconlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!(target: "cache::fetch", "GET {}", url);

        let response = self.client.get(url).send().await.map_err(|err| {
            IconlensError::NetworkError {
                url: url.to_string(),
                reason: err.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IconlensError::NetworkError {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            }
            .into());
        }

        response.text().await.map_err(|err| {
            IconlensError::NetworkError {
                url: url.to_string(),
                reason: format!("failed to read response body: {err}"),
            }
            .into()
        })
    }
}

impl IconSetFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>> {
        self.get_text(url).boxed()
    }
}

/// URL of collection `id` below `base_url`.
#[must_use]
pub fn collection_url(base_url: &str, id: &str) -> String {
    format!("{}/{id}.json", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url() {
        assert_eq!(
            collection_url("https://icones.js.org/collections", "mdi"),
            "https://icones.js.org/collections/mdi.json"
        );
        assert_eq!(collection_url("http://localhost:8080/", "demo"), "http://localhost:8080/demo.json");
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new().is_ok());
    }
}
