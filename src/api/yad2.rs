use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::types::{FeedResponse, Marker};
use crate::core::FeedConfig;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("listing feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("listing feed returned status {0}")]
    Status(reqwest::StatusCode),
}

/// The listing feed, abstracted so cycles can be driven against a scripted
/// snapshot in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the full current snapshot of advertised listings, in feed order.
    async fn fetch_snapshot(&self) -> Result<Vec<Marker>, SourceError>;
}

pub struct Yad2Client {
    client: Client,
    api_url: String,
}

impl Yad2Client {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
        }
    }
}

#[async_trait]
impl ListingSource for Yad2Client {
    async fn fetch_snapshot(&self) -> Result<Vec<Marker>, SourceError> {
        let response = self.client.get(&self.api_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Yad2 feed error: {} - {}", status, body);
            return Err(SourceError::Status(status));
        }

        let feed: FeedResponse = response.json().await?;
        Ok(feed.data.markers)
    }
}
