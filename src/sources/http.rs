//! HTTP/HTTPS fetcher.

use super::{Fetcher, Target};
use crate::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Browser-like agent; the ticketing widgets reject unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Fetches targets with a plain GET request.
///
/// Any non-2xx status is reported as an error so the watch loop keeps the
/// previous snapshot instead of comparing an error page.
///
/// # Examples
///
/// ```rust,no_run
/// use padel_watch::sources::HttpFetcher;
/// use std::time::Duration;
///
/// # fn example() -> padel_watch::error::Result<()> {
/// let fetcher = HttpFetcher::builder()
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new builder for constructing an HTTP fetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::new()
    }

    /// Request timeout applied to every fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> Result<String> {
        let response = self
            .client
            .get(&target.url)
            .send()
            .await
            .map_err(|e| WatchError::Fetch {
                target: target.name.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Status {
                target: target.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| WatchError::Fetch {
            target: target.name.clone(),
            reason: format!("failed to read body: {}", e),
        })?;

        debug!(target = %target.name, bytes = body.len(), "Fetched target");
        Ok(body)
    }

    fn name(&self) -> String {
        "http".to_string()
    }
}

/// Builder for constructing an `HttpFetcher`.
pub struct HttpFetcherBuilder {
    timeout: Duration,
    user_agent: String,
}

impl HttpFetcherBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the request timeout.
    ///
    /// Default is 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpFetcher> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;

        Ok(HttpFetcher {
            client,
            timeout: self.timeout,
        })
    }
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let fetcher = HttpFetcher::builder().build().unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(30));
        assert_eq!(fetcher.name(), "http");
    }

    #[test]
    fn test_builder_with_timeout() {
        let fetcher = HttpFetcher::builder()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("padel-watch-test")
            .build()
            .unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        let fetcher = HttpFetcher::builder()
            .with_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let target = Target {
            name: "closed".to_string(),
            url: "http://127.0.0.1:9/".to_string(),
        };

        let err = fetcher.fetch(&target).await.unwrap_err();
        assert!(matches!(err, WatchError::Fetch { ref target, .. } if target == "closed"));
    }
}
