//! Scripted provider for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::types::GenerationRequest;
use crate::TextProvider;

/// Scripted [`TextProvider`] that replays queued responses and records the
/// prompts it was called with.
///
/// Responses are consumed front-to-back; once the queue is empty every call
/// fails, which makes "provider down" scenarios trivial to stage:
///
/// ```rust,ignore
/// let ok = MockProvider::new("primary").with_response("generated text");
/// let down = MockProvider::new("secondary"); // fails every call
/// ```
pub struct MockProvider {
    name: &'static str,
    responses: Arc<Mutex<Vec<Result<String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response.
    pub fn with_response(self, text: &str) -> Self {
        self.responses.lock().unwrap().push(Ok(text.to_string()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Err(AiError::Api(message.to_string())));
        self
    }

    /// Prompts this provider was called with, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made against this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.prompt.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(AiError::Network(format!(
                "{}: no scripted response",
                self.name
            )));
        }
        responses.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_responses_in_order() {
        let provider = MockProvider::new("scripted")
            .with_response("first")
            .with_error("boom");

        let req = GenerationRequest::new("prompt");
        assert_eq!(provider.generate(&req).await.unwrap(), "first");
        assert!(provider.generate(&req).await.is_err());
        // Exhausted queue keeps failing
        assert!(provider.generate(&req).await.is_err());
        assert_eq!(provider.call_count(), 3);
    }
}
