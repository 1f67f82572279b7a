//! YouTube Data API channel statistics lookup

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::constants::USER_AGENT;
use crate::error::LookupError;

/// Source of channel subscriber counts.
///
/// `Ok(None)` means the service answered but knows no such channel.
#[async_trait]
pub trait ChannelLookup {
    async fn lookup_subscribers(&self, channel_id: &str) -> Result<Option<u64>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    /// The API sends counts as decimal strings.
    subscriber_count: Option<String>,
}

/// `channels.list?part=statistics` client
pub struct YouTubeClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ChannelLookup for YouTubeClient {
    async fn lookup_subscribers(&self, channel_id: &str) -> Result<Option<u64>, LookupError> {
        let url = format!("{}/channels", self.base_url);
        debug!(channel_id = %channel_id, "Querying channel statistics");

        let response = self
            .http_client
            .get(&url)
            .query(&[("part", "statistics"), ("id", channel_id), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LookupError::Http { status: status.as_u16(), message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        parse_subscriber_count(&body)
    }
}

fn parse_subscriber_count(body: &str) -> Result<Option<u64>, LookupError> {
    let parsed: ChannelListResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let Some(item) = parsed.items.first() else {
        return Ok(None);
    };

    let raw = item
        .statistics
        .as_ref()
        .and_then(|s| s.subscriber_count.as_deref())
        .ok_or_else(|| LookupError::Decode("subscriberCount missing from statistics".to_string()))?;

    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| LookupError::Decode(format!("subscriberCount '{}': {}", raw, e)))
}
