use async_trait::async_trait;
use reqwest::StatusCode;

use super::FeedSource;
use super::decode::{FeedOutcome, decode_document};

/// HTTP transport for the actions feed.
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch and decode one feed cycle. Never fails: transport-level
    /// problems collapse into the single synthetic error message.
    pub async fn fetch(&self) -> FeedOutcome {
        let response = match self.http.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Feed request to {} failed: {}", self.url, e);
                return FeedOutcome::transport_failure();
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to read feed response: {}", e);
                return FeedOutcome::transport_failure();
            }
        };

        settle(status, &body)
    }
}

/// Turn a completed response into the cycle's outcome. A failed status
/// whose body still carries structured errors surfaces those instead of
/// the generic transport message.
fn settle(status: StatusCode, body: &str) -> FeedOutcome {
    match decode_document(body) {
        Ok(outcome) if status.is_success() || !outcome.error_messages.is_empty() => outcome,
        Ok(_) => {
            log::warn!("Feed returned status {} with no structured errors", status);
            FeedOutcome::transport_failure()
        }
        Err(e) => {
            log::warn!("Feed response was not a valid document: {}", e);
            FeedOutcome::transport_failure()
        }
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self) -> FeedOutcome {
        FeedClient::fetch(self).await
    }
}
