//! Instagram Graph API publisher.
//!
//! Instagram has no text-only posts: publishing is a two-step flow that
//! creates a media container (image + caption) and then publishes it. Both
//! steps are single POSTs with no retry; the `link` argument supplies the
//! image URL.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, SocialError};
use crate::{non_empty, Platform, Publisher};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Instagram business account credentials.
#[derive(Debug, Clone, Default)]
pub struct InstagramOptions {
    pub access_token: Option<String>,
    pub account_id: Option<String>,
}

/// Publishes image+caption posts to an Instagram business account.
#[derive(Clone)]
pub struct InstagramPublisher {
    options: InstagramOptions,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

impl InstagramPublisher {
    pub fn new(options: InstagramOptions) -> Self {
        Self {
            options: InstagramOptions {
                access_token: non_empty(options.access_token),
                account_id: non_empty(options.account_id),
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

    async fn post_for_id(&self, url: String, params: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .post(url)
            .timeout(std::time::Duration::from_secs(30))
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Instagram request failed");
                SocialError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Instagram API error");
            return Err(SocialError::Api {
                platform: Platform::Instagram,
                body,
            });
        }

        let parsed: IdResponse = response
            .json()
            .await
            .map_err(|e| SocialError::Parse(format!("Instagram response: {}", e)))?;
        Ok(parsed.id)
    }
}

#[async_trait]
impl Publisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn is_configured(&self) -> bool {
        self.options.access_token.is_some() && self.options.account_id.is_some()
    }

    async fn publish(&self, message: &str, link: Option<&str>) -> Result<String> {
        let (token, account_id) = match (&self.options.access_token, &self.options.account_id) {
            (Some(token), Some(account_id)) => (token, account_id),
            _ => {
                return Err(SocialError::MissingCredentials {
                    platform: Platform::Instagram,
                })
            }
        };

        let image_url = link.ok_or_else(|| SocialError::Api {
            platform: Platform::Instagram,
            body: "Instagram posts require a media url".to_string(),
        })?;

        let creation_id = self
            .post_for_id(
                format!("{}/{}/media", self.base_url, account_id),
                &[
                    ("image_url", image_url),
                    ("caption", message),
                    ("access_token", token),
                ],
            )
            .await?;

        let post_id = self
            .post_for_id(
                format!("{}/{}/media_publish", self.base_url, account_id),
                &[
                    ("creation_id", creation_id.as_str()),
                    ("access_token", token),
                ],
            )
            .await?;

        info!(post_id = %post_id, "Instagram post successful");
        Ok(post_id)
    }
}
