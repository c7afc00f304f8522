//! Anthropic Messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AiError, Result};
use crate::types::GenerationRequest;
use crate::TextProvider;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from the `CLAUDE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CLAUDE_API_KEY")
            .map_err(|_| AiError::Config("CLAUDE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TextProvider for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![MessageBody {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .timeout(std::time::Duration::from_secs(30))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Anthropic request failed");
                AiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Anthropic API error");
            return Err(AiError::Api(format!("Anthropic API error: {}", error_text)));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AiError::Api("No content from Anthropic".into()))?;

        debug!(model = %self.model, chars = text.len(), "Anthropic completion");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = AnthropicClient::new("sk-ant-test")
            .with_base_url("https://custom.api.com")
            .with_model("claude-3-haiku-20240307");

        assert_eq!(client.api_key, "sk-ant-test");
        assert_eq!(client.base_url, "https://custom.api.com");
        assert_eq!(client.model, "claude-3-haiku-20240307");
        assert_eq!(client.name(), "anthropic");
    }
}
