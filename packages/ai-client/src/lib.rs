//! Provider-agnostic text generation clients
//!
//! Thin REST clients for the Anthropic, OpenAI and Gemini text APIs behind a
//! single [`TextProvider`] trait, so callers can hold an ordered list of
//! providers without caring which vendor answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_client::{AnthropicClient, GenerationRequest, TextProvider};
//!
//! let client = AnthropicClient::from_env()?;
//!
//! let text = client
//!     .generate(&GenerationRequest::new("Write a short post about practice mutes"))
//!     .await?;
//! ```
//!
//! Each client is a plain `reqwest` wrapper: one outbound request per call,
//! no retry, no streaming. Failures are reported through [`AiError`] and the
//! caller decides whether to move on to the next provider.

pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod types;

pub use anthropic::AnthropicClient;
pub use error::{AiError, Result};
pub use gemini::GeminiClient;
pub use mock::MockProvider;
pub use openai::OpenAiClient;
pub use types::{strip_code_blocks, GenerationRequest};

use async_trait::async_trait;

/// A third-party text-generation API.
///
/// Implementations issue exactly one outbound request per `generate` call and
/// surface every failure mode (network, non-2xx, malformed body) as an
/// [`AiError`] so fallback chains can advance past a broken provider.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short stable tag for this provider ("anthropic", "openai", "gemini").
    /// Used as the `source` label on generated content and as the counter key.
    fn name(&self) -> &'static str;

    /// Generate text for a prompt.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
