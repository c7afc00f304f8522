//! Recording publisher for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Result, SocialError};
use crate::{Platform, Publisher};

/// Call captured by a [`MockPublisher`].
#[derive(Debug, Clone)]
pub struct PublishCall {
    pub message: String,
    pub link: Option<String>,
}

/// Scripted [`Publisher`] that records calls and replays queued outcomes.
///
/// With no scripted outcomes a configured mock succeeds with a synthetic
/// post id; an unconfigured mock always fails with the credentials error and
/// records nothing sent upstream.
pub struct MockPublisher {
    platform: Platform,
    configured: bool,
    outcomes: Arc<Mutex<Vec<Result<String>>>>,
    calls: Arc<Mutex<Vec<PublishCall>>>,
}

impl MockPublisher {
    pub fn configured(platform: Platform) -> Self {
        Self {
            platform,
            configured: true,
            outcomes: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unconfigured(platform: Platform) -> Self {
        Self {
            configured: false,
            ..Self::configured(platform)
        }
    }

    /// Queue a successful outcome with the given post id.
    pub fn with_post_id(self, post_id: &str) -> Self {
        self.outcomes.lock().unwrap().push(Ok(post_id.to_string()));
        self
    }

    /// Queue an upstream failure.
    pub fn with_api_error(self, body: &str) -> Self {
        let platform = self.platform;
        self.outcomes.lock().unwrap().push(Err(SocialError::Api {
            platform,
            body: body.to_string(),
        }));
        self
    }

    /// Every publish call that reached this mock (credential failures are
    /// rejected before recording, mirroring "no outbound call").
    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn publish(&self, message: &str, link: Option<&str>) -> Result<String> {
        if !self.configured {
            return Err(SocialError::MissingCredentials {
                platform: self.platform,
            });
        }

        self.calls.lock().unwrap().push(PublishCall {
            message: message.to_string(),
            link: link.map(|l| l.to_string()),
        });

        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Ok(format!("{}_post_1", self.platform));
        }
        outcomes.remove(0)
    }
}
