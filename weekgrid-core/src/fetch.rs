//! Retrieving iCalendar feeds over HTTP.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, instrument};
use url::Url;

use crate::constants::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::error::{GridError, GridResult};
use crate::event::FeedEvent;
use crate::ics::parse_feed;

/// Fetches calendar feeds. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Self {
        FeedClient {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Download and parse the feed at `url`.
    pub async fn fetch_feed(&self, url: &str) -> GridResult<Vec<FeedEvent>> {
        let body = self.fetch(url).await?;
        parse_feed(&body)
    }

    /// Download the raw feed text. `webcal://` URLs are fetched over https.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, url: &str) -> GridResult<String> {
        let url = feed_url(url)?;

        timeout(self.timeout, self.get(url))
            .await
            .map_err(|_| GridError::FetchTimeout(self.timeout.as_secs()))?
    }

    async fn get(&self, url: Url) -> GridResult<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| GridError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridError::Fetch(format!("{} returned {}", url, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GridError::Fetch(format!("{}: {}", url, e)))?;

        debug!(bytes = body.len(), "Fetched feed");
        Ok(body)
    }
}

/// Normalize a user-supplied feed URL.
fn feed_url(raw: &str) -> GridResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| GridError::Fetch(format!("invalid URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        "webcal" | "webcals" => {
            let rest = &url.as_str()[url.scheme().len()..];
            Url::parse(&format!("https{}", rest))
                .map_err(|e| GridError::Fetch(format!("invalid URL '{}': {}", raw, e)))
        }
        other => Err(GridError::Fetch(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, raw
        ))),
    }
}
