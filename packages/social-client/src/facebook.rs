//! Facebook Graph API publisher.
//!
//! The Graph feed endpoint takes form-encoded bodies, unlike the JSON APIs of
//! the other networks.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, SocialError};
use crate::{non_empty, Platform, Publisher};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Facebook page credentials.
#[derive(Debug, Clone, Default)]
pub struct FacebookOptions {
    pub page_access_token: Option<String>,
    pub page_id: Option<String>,
}

/// Publishes to a Facebook page feed.
#[derive(Clone)]
pub struct FacebookPublisher {
    options: FacebookOptions,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    id: String,
}

/// Identity behind an access token, from `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenIdentity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Page metadata, from `GET /{page_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
}

impl FacebookPublisher {
    pub fn new(options: FacebookOptions) -> Self {
        Self {
            options: FacebookOptions {
                page_access_token: non_empty(options.page_access_token),
                page_id: non_empty(options.page_id),
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

    fn credentials(&self) -> Result<(&str, &str)> {
        match (&self.options.page_access_token, &self.options.page_id) {
            (Some(token), Some(page_id)) => Ok((token, page_id)),
            _ => Err(SocialError::MissingCredentials {
                platform: Platform::Facebook,
            }),
        }
    }

    /// Validate the access token by asking the Graph API who it belongs to.
    pub async fn token_identity(&self) -> Result<TokenIdentity> {
        let (token, _) = self.credentials()?;

        let response = self
            .client
            .get(format!("{}/me", self.base_url))
            .timeout(std::time::Duration::from_secs(30))
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|e| SocialError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::Api {
                platform: Platform::Facebook,
                body,
            });
        }

        response
            .json::<TokenIdentity>()
            .await
            .map_err(|e| SocialError::Parse(e.to_string()))
    }

    /// Fetch metadata for the configured page.
    pub async fn page_info(&self) -> Result<PageInfo> {
        let (token, page_id) = self.credentials()?;

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, page_id))
            .timeout(std::time::Duration::from_secs(30))
            .query(&[
                ("access_token", token),
                ("fields", "id,name,followers_count"),
            ])
            .send()
            .await
            .map_err(|e| SocialError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::Api {
                platform: Platform::Facebook,
                body,
            });
        }

        response
            .json::<PageInfo>()
            .await
            .map_err(|e| SocialError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Publisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn is_configured(&self) -> bool {
        self.options.page_access_token.is_some() && self.options.page_id.is_some()
    }

    async fn publish(&self, message: &str, link: Option<&str>) -> Result<String> {
        let (token, page_id) = self.credentials()?;

        let mut form: HashMap<&str, &str> = HashMap::new();
        form.insert("message", message);
        form.insert("access_token", token);
        if let Some(link) = link {
            form.insert("link", link);
        }

        let response = self
            .client
            .post(format!("{}/{}/feed", self.base_url, page_id))
            .timeout(std::time::Duration::from_secs(30))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Facebook request failed");
                SocialError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Facebook API error");
            return Err(SocialError::Api {
                platform: Platform::Facebook,
                body,
            });
        }

        let feed: FeedResponse = response
            .json()
            .await
            .map_err(|e| SocialError::Parse(format!("Facebook feed response: {}", e)))?;

        info!(post_id = %feed.id, "Facebook post successful");
        Ok(feed.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let publisher = FacebookPublisher::new(FacebookOptions::default());

        assert!(!publisher.is_configured());
        let err = publisher.publish("hello", None).await.unwrap_err();
        assert!(err.is_missing_credentials());
    }

    #[test]
    fn test_empty_credentials_count_as_absent() {
        let publisher = FacebookPublisher::new(FacebookOptions {
            page_access_token: Some(String::new()),
            page_id: Some("123".to_string()),
        });

        assert!(!publisher.is_configured());
    }
}
