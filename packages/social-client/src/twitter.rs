//! Twitter/X v2 tweets publisher.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{Result, SocialError};
use crate::{non_empty, Platform, Publisher};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2";

/// Twitter credentials (OAuth2 bearer with write scope).
#[derive(Debug, Clone, Default)]
pub struct TwitterOptions {
    pub bearer_token: Option<String>,
}

/// Publishes tweets through the v2 API.
#[derive(Clone)]
pub struct TwitterPublisher {
    options: TwitterOptions,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

impl TwitterPublisher {
    pub fn new(options: TwitterOptions) -> Self {
        Self {
            options: TwitterOptions {
                bearer_token: non_empty(options.bearer_token),
            },
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set a custom base URL (for tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    fn is_configured(&self) -> bool {
        self.options.bearer_token.is_some()
    }

    async fn publish(&self, message: &str, _link: Option<&str>) -> Result<String> {
        let token = self.options.bearer_token.as_ref().ok_or(
            SocialError::MissingCredentials {
                platform: Platform::Twitter,
            },
        )?;

        let response = self
            .client
            .post(format!("{}/tweets", self.base_url))
            .timeout(std::time::Duration::from_secs(30))
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&json!({ "text": message }))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Twitter request failed");
                SocialError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Twitter API error");
            return Err(SocialError::Api {
                platform: Platform::Twitter,
                body,
            });
        }

        let tweet: TweetResponse = response
            .json()
            .await
            .map_err(|e| SocialError::Parse(format!("Twitter tweets response: {}", e)))?;

        info!(post_id = %tweet.data.id, "Tweet successful");
        Ok(tweet.data.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let publisher = TwitterPublisher::new(TwitterOptions::default());

        assert!(!publisher.is_configured());
        let err = publisher.publish("hello", None).await.unwrap_err();
        assert!(err.is_missing_credentials());
    }
}
