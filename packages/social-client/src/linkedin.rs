//! LinkedIn ugcPosts publisher.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{Result, SocialError};
use crate::{non_empty, Platform, Publisher};

const DEFAULT_BASE_URL: &str = "https://api.linkedin.com/v2";

/// LinkedIn member credentials.
#[derive(Debug, Clone, Default)]
pub struct LinkedInOptions {
    pub access_token: Option<String>,
    pub person_id: Option<String>,
}

/// Publishes member shares through the ugcPosts API.
#[derive(Clone)]
pub struct LinkedInPublisher {
    options: LinkedInOptions,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UgcPostResponse {
    id: String,
}

impl LinkedInPublisher {
    pub fn new(options: LinkedInOptions) -> Self {
        Self {
            options: LinkedInOptions {
                access_token: non_empty(options.access_token),
                person_id: non_empty(options.person_id),
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
impl Publisher for LinkedInPublisher {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    fn is_configured(&self) -> bool {
        self.options.access_token.is_some() && self.options.person_id.is_some()
    }

    async fn publish(&self, message: &str, _link: Option<&str>) -> Result<String> {
        let (token, person_id) = match (&self.options.access_token, &self.options.person_id) {
            (Some(token), Some(person_id)) => (token, person_id),
            _ => {
                return Err(SocialError::MissingCredentials {
                    platform: Platform::Linkedin,
                })
            }
        };

        let body = json!({
            "author": format!("urn:li:person:{}", person_id),
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": message },
                    "shareMediaCategory": "NONE"
                }
            },
            "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" }
        });

        let response = self
            .client
            .post(format!("{}/ugcPosts", self.base_url))
            .timeout(std::time::Duration::from_secs(30))
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "LinkedIn request failed");
                SocialError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "LinkedIn API error");
            return Err(SocialError::Api {
                platform: Platform::Linkedin,
                body,
            });
        }

        let post: UgcPostResponse = response
            .json()
            .await
            .map_err(|e| SocialError::Parse(format!("LinkedIn ugcPosts response: {}", e)))?;

        info!(post_id = %post.id, "LinkedIn post successful");
        Ok(post.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let publisher = LinkedInPublisher::new(LinkedInOptions {
            access_token: Some("token".to_string()),
            person_id: None,
        });

        assert!(!publisher.is_configured());
        let err = publisher.publish("hello", None).await.unwrap_err();
        assert!(err.is_missing_credentials());
    }
}
