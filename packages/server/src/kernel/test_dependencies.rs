// TestDependencies - scripted implementations for testing
//
// Wires an app state from mock providers and publishers so handler and
// kernel tests never touch the network.

use std::sync::Arc;

use ai_client::{MockProvider, TextProvider};
use chrono::Utc;
use social_client::{FacebookOptions, FacebookPublisher, MockPublisher, PublisherRegistry};

use crate::config::{BrandConfig, Config, PostingConfig};
use crate::kernel::engine::ContentEngine;
use crate::kernel::store::{ContentStore, MemoryStore};
use crate::server::app::AppState;

/// Builder for a fully in-memory application state.
#[derive(Default)]
pub struct TestDependencies {
    providers: Vec<Arc<MockProvider>>,
    publishers: Vec<Arc<MockPublisher>>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scripted provider to the generation chain.
    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Register a scripted publisher.
    pub fn with_publisher(mut self, publisher: MockPublisher) -> Self {
        self.publishers.push(Arc::new(publisher));
        self
    }

    /// Handles onto the scripted doubles, for assertions after the fact.
    pub fn providers(&self) -> &[Arc<MockProvider>] {
        &self.providers
    }

    pub fn publishers(&self) -> &[Arc<MockPublisher>] {
        &self.publishers
    }

    /// Build the app state. The returned [`MemoryStore`] handle aliases the
    /// one inside the state.
    pub fn state(&self) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let content_store: Arc<dyn ContentStore> = store.clone();

        let chain: Vec<Arc<dyn TextProvider>> = self
            .providers
            .iter()
            .map(|p| p.clone() as Arc<dyn TextProvider>)
            .collect();

        let mut registry = PublisherRegistry::new();
        for publisher in &self.publishers {
            registry = registry.register(publisher.clone());
        }

        let config = Config {
            port: 0,
            claude_api_key: None,
            openai_api_key: None,
            gemini_api_key: None,
            facebook_page_access_token: None,
            facebook_page_id: None,
            linkedin_access_token: None,
            linkedin_person_id: None,
            instagram_access_token: None,
            instagram_account_id: None,
            twitter_bearer_token: None,
            brand: BrandConfig::default(),
            posting: PostingConfig::default(),
        };

        let engine = Arc::new(ContentEngine::new(
            chain,
            content_store.clone(),
            config.brand.clone(),
        ));

        let state = AppState {
            store: content_store,
            engine,
            registry,
            facebook: FacebookPublisher::new(FacebookOptions::default()),
            config: Arc::new(config),
            started_at: Utc::now(),
        };
        (state, store)
    }
}
