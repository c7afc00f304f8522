//! Content generation facade.
//!
//! Tries providers in priority order and takes the first usable response;
//! when the whole chain is down the static templates answer instead, so
//! generation as a whole cannot fail.

use std::sync::Arc;

use ai_client::{GenerationRequest, TextProvider};
use chrono::Utc;
use social_client::Platform;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::BrandConfig;
use crate::kernel::prompts;
use crate::kernel::store::{ContentStore, GeneratedContent};

/// Source tag used when the static templates answered.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Multi-provider content generator.
pub struct ContentEngine {
    providers: Vec<Arc<dyn TextProvider>>,
    store: Arc<dyn ContentStore>,
    brand: BrandConfig,
}

impl ContentEngine {
    /// Create an engine over an ordered provider chain. An empty chain is
    /// valid; every generation then comes from the templates.
    pub fn new(
        providers: Vec<Arc<dyn TextProvider>>,
        store: Arc<dyn ContentStore>,
        brand: BrandConfig,
    ) -> Self {
        Self {
            providers,
            store,
            brand,
        }
    }

    /// Provider tags in chain order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Generate one content item and append it to the store.
    ///
    /// Provider failures advance the chain and bump that provider's error
    /// counter; the first success wins and stops the iteration. This method
    /// itself cannot fail: exhaustion lands on the deterministic template.
    pub async fn generate(
        &self,
        topic: Option<&str>,
        platforms: &[Platform],
    ) -> GeneratedContent {
        let topic = match topic.filter(|t| !t.trim().is_empty()) {
            Some(t) => t,
            None => prompts::pick_topic(),
        };
        let request = GenerationRequest::new(prompts::build_prompt(&self.brand, topic));

        let (texts, source) = self.run_chain(&request, platforms).await.unwrap_or_else(|| {
            info!(topic = %topic, "All providers exhausted, using fallback template");
            (prompts::fallback_texts(topic, platforms), FALLBACK_SOURCE)
        });

        let item = GeneratedContent {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            source: source.to_string(),
            texts,
            generated_at: Utc::now(),
        };
        self.store.push_content(item.clone());
        item
    }

    /// Generate several items over random topics. Individual items cannot
    /// fail (the fallback always answers), so the batch is always full.
    pub async fn generate_batch(
        &self,
        count: usize,
        platforms: &[Platform],
    ) -> Vec<GeneratedContent> {
        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            batch.push(self.generate(None, platforms).await);
        }
        info!(count = batch.len(), "Generated content batch");
        batch
    }

    async fn run_chain(
        &self,
        request: &GenerationRequest,
        platforms: &[Platform],
    ) -> Option<(crate::kernel::store::PlatformTexts, &'static str)> {
        for provider in &self.providers {
            match provider.generate(request).await {
                Ok(raw) => {
                    self.store.record_provider_success(provider.name());
                    // Structured answer preferred, sliced answer accepted
                    let texts = prompts::parse_response(&raw, platforms)
                        .unwrap_or_else(|| prompts::slice_response(&raw, platforms));
                    debug!(provider = provider.name(), "Provider produced content");
                    return Some((texts, provider.name()));
                }
                Err(e) => {
                    self.store.record_provider_error(provider.name());
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_client::MockProvider;
    use crate::kernel::store::MemoryStore;

    const ALL: [Platform; 4] = Platform::ALL;

    fn engine_with(providers: Vec<Arc<dyn TextProvider>>) -> (ContentEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let engine = ContentEngine::new(
            providers,
            store.clone(),
            crate::config::BrandConfig::default(),
        );
        (engine, store)
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let primary = Arc::new(MockProvider::new("anthropic").with_response(
            r#"{"facebook": "fb", "linkedin": "li", "instagram": "ig", "twitter": "tw"}"#,
        ));
        let secondary = Arc::new(MockProvider::new("openai"));
        let (engine, store) = engine_with(vec![primary.clone(), secondary.clone()]);

        let item = engine.generate(Some("topic"), &ALL).await;

        assert_eq!(item.source, "anthropic");
        assert_eq!(item.texts[&Platform::Facebook], "fb");
        assert_eq!(primary.call_count(), 1);
        // Second provider never consulted
        assert_eq!(secondary.call_count(), 0);
        assert_eq!(store.provider_counters()["anthropic"].successes, 1);
    }

    #[tokio::test]
    async fn test_failure_advances_to_next_provider() {
        let primary = Arc::new(MockProvider::new("anthropic").with_error("overloaded"));
        let secondary = Arc::new(MockProvider::new("openai").with_response("plain prose answer"));
        let (engine, store) = engine_with(vec![primary, secondary]);

        let item = engine.generate(Some("topic"), &ALL).await;

        assert_eq!(item.source, "openai");
        // Prose fails the strict parse and goes through the slicer
        assert!(item.texts[&Platform::Facebook].starts_with("plain prose answer"));
        let counters = store.provider_counters();
        assert_eq!(counters["anthropic"].errors, 1);
        assert_eq!(counters["openai"].successes, 1);
    }

    #[tokio::test]
    async fn test_exhausted_chain_falls_back_to_template() {
        let a = Arc::new(MockProvider::new("anthropic"));
        let b = Arc::new(MockProvider::new("openai"));
        let c = Arc::new(MockProvider::new("gemini"));
        let (engine, store) = engine_with(vec![a, b, c]);

        let item = engine.generate(Some("silent practice tips"), &ALL).await;

        assert_eq!(item.source, FALLBACK_SOURCE);
        for platform in ALL {
            assert!(!item.texts[&platform].is_empty());
        }
        assert!(item.texts[&Platform::Twitter].chars().count() <= 280);
        let counters = store.provider_counters();
        assert_eq!(counters["anthropic"].errors, 1);
        assert_eq!(counters["openai"].errors, 1);
        assert_eq!(counters["gemini"].errors, 1);
    }

    #[tokio::test]
    async fn test_no_providers_configured_still_generates() {
        let (engine, store) = engine_with(vec![]);

        let item = engine.generate(Some("silent practice tips"), &ALL).await;

        assert_eq!(item.source, FALLBACK_SOURCE);
        assert!(!item.texts[&Platform::Facebook].is_empty());
        assert_eq!(store.queue_stats().total, 1);
        assert!(store.provider_counters().is_empty());
    }

    #[tokio::test]
    async fn test_generate_batch_fills_queue() {
        let (engine, store) = engine_with(vec![]);

        let batch = engine.generate_batch(3, &ALL).await;

        assert_eq!(batch.len(), 3);
        assert_eq!(store.queue_stats().total, 3);
        assert_eq!(store.queue_stats().pending, 3);
    }

    #[tokio::test]
    async fn test_blank_topic_gets_replaced() {
        let (engine, _) = engine_with(vec![]);

        let item = engine.generate(Some("   "), &ALL).await;

        assert!(!item.topic.trim().is_empty());
        assert!(crate::kernel::prompts::TOPICS.contains(&item.topic.as_str()));
    }
}
