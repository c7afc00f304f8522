//! Error types for the social publishing clients.

use thiserror::Error;

use crate::Platform;

/// Result type for publishing operations.
pub type Result<T> = std::result::Result<T, SocialError>;

/// Social publishing errors.
#[derive(Debug, Error)]
pub enum SocialError {
    /// Required token or account id absent; no outbound call was made.
    #[error("{platform} credentials not configured")]
    MissingCredentials { platform: Platform },

    /// Connection failed or timed out.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx from the platform; `body` is the upstream error verbatim.
    #[error("{platform} API error: {body}")]
    Api { platform: Platform, body: String },

    /// 2xx response without a parsable post identifier.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request named a platform this crate does not support.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

impl SocialError {
    /// True when the failure is a local precondition (nothing was sent).
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, SocialError::MissingCredentials { .. })
    }
}
