//! Thin REST clients for publishing text to social platforms.
//!
//! Every network sits behind the same [`Publisher`] contract: check
//! credential presence, issue exactly one publish attempt, report a post id
//! or the upstream error body. No retry, no backoff, no idempotency keys.
//!
//! Publishers are dispatched through a [`PublisherRegistry`] keyed by
//! [`Platform`], so callers never match on platform names themselves.

pub mod error;
pub mod facebook;
pub mod instagram;
pub mod linkedin;
pub mod mock;
pub mod twitter;

pub use error::{Result, SocialError};
pub use facebook::{FacebookOptions, FacebookPublisher};
pub use instagram::{InstagramOptions, InstagramPublisher};
pub use linkedin::{LinkedInOptions, LinkedInPublisher};
pub use mock::MockPublisher;
pub use twitter::{TwitterOptions, TwitterPublisher};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A social network destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Linkedin,
    Instagram,
    Twitter,
}

impl Platform {
    /// Every supported platform, in publish order.
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Linkedin,
        Platform::Instagram,
        Platform::Twitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = SocialError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "linkedin" => Ok(Platform::Linkedin),
            "instagram" => Ok(Platform::Instagram),
            // "x" is the rebranded name; both spellings arrive in requests
            "twitter" | "x" => Ok(Platform::Twitter),
            other => Err(SocialError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Uniform publishing capability over one social network.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// The network this publisher delivers to.
    fn platform(&self) -> Platform;

    /// Whether every credential this network needs is present.
    fn is_configured(&self) -> bool;

    /// Deliver a text payload, returning the upstream post id.
    ///
    /// Must return [`SocialError::MissingCredentials`] without any outbound
    /// call when `is_configured()` is false.
    async fn publish(&self, message: &str, link: Option<&str>) -> Result<String>;
}

/// Registry of publishers keyed by platform.
#[derive(Clone, Default)]
pub struct PublisherRegistry {
    publishers: HashMap<Platform, Arc<dyn Publisher>>,
}

impl PublisherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publisher under its own platform key. Later registrations
    /// for the same platform replace earlier ones.
    pub fn register(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publishers.insert(publisher.platform(), publisher);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn Publisher>> {
        self.publishers.get(&platform).cloned()
    }

    /// Every registered platform, configured or not.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.publishers.keys().copied().collect();
        platforms.sort();
        platforms
    }

    /// Platforms with a registered, fully-credentialed publisher.
    pub fn configured_platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self
            .publishers
            .values()
            .filter(|p| p.is_configured())
            .map(|p| p.platform())
            .collect();
        platforms.sort();
        platforms
    }

    /// Credential presence per registered platform.
    pub fn credential_report(&self) -> HashMap<Platform, bool> {
        self.publishers
            .iter()
            .map(|(platform, publisher)| (*platform, publisher.is_configured()))
            .collect()
    }
}

/// Normalize an optional credential: empty strings count as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
