//! Application setup and server configuration.

use std::sync::Arc;

use ai_client::{AnthropicClient, GeminiClient, OpenAiClient, TextProvider};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use social_client::{
    FacebookOptions, FacebookPublisher, InstagramOptions, InstagramPublisher, LinkedInOptions,
    LinkedInPublisher, PublisherRegistry, TwitterOptions, TwitterPublisher,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::scheduled_tasks::AutomationDeps;
use crate::kernel::store::ContentStore;
use crate::kernel::{ContentEngine, MemoryStore};
use crate::server::routes::{
    analytics_handler, clear_handler, facebook_test_handler, generate_batch_handler,
    generate_handler, get_content_handler, health_handler, list_content_handler, pause_handler,
    publish_handler, resume_handler, schedule_handler, stats_handler, status_handler, test_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub engine: Arc<ContentEngine>,
    pub registry: PublisherRegistry,
    /// Concrete handle kept for the staged Facebook diagnostic endpoint.
    pub facebook: FacebookPublisher,
    pub config: Arc<Config>,
    pub started_at: DateTime<Utc>,
}

/// Build the shared state from configuration: the provider chain in priority
/// order (Anthropic, OpenAI, Gemini - absent keys shrink the chain), one
/// publisher per supported platform, and the bounded in-memory store.
pub fn build_state(config: Config) -> AppState {
    let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new(
        config.posting.queue_capacity,
        config.posting.posts_capacity,
    ));

    let mut providers: Vec<Arc<dyn TextProvider>> = Vec::new();
    if let Some(key) = config.claude_api_key.clone().filter(|k| !k.is_empty()) {
        providers.push(Arc::new(AnthropicClient::new(key)));
    }
    if let Some(key) = config.openai_api_key.clone().filter(|k| !k.is_empty()) {
        providers.push(Arc::new(OpenAiClient::new(key)));
    }
    if let Some(key) = config.gemini_api_key.clone().filter(|k| !k.is_empty()) {
        providers.push(Arc::new(GeminiClient::new(key)));
    }
    if providers.is_empty() {
        tracing::warn!("No provider API keys configured - every generation will use fallback templates");
    }

    let facebook = FacebookPublisher::new(FacebookOptions {
        page_access_token: config.facebook_page_access_token.clone(),
        page_id: config.facebook_page_id.clone(),
    });

    let registry = PublisherRegistry::new()
        .register(Arc::new(facebook.clone()))
        .register(Arc::new(LinkedInPublisher::new(LinkedInOptions {
            access_token: config.linkedin_access_token.clone(),
            person_id: config.linkedin_person_id.clone(),
        })))
        .register(Arc::new(InstagramPublisher::new(InstagramOptions {
            access_token: config.instagram_access_token.clone(),
            account_id: config.instagram_account_id.clone(),
        })))
        .register(Arc::new(TwitterPublisher::new(TwitterOptions {
            bearer_token: config.twitter_bearer_token.clone(),
        })));

    let engine = Arc::new(ContentEngine::new(
        providers,
        store.clone(),
        config.brand.clone(),
    ));

    AppState {
        store,
        engine,
        registry,
        facebook,
        config: Arc::new(config),
        started_at: Utc::now(),
    }
}

/// Dependencies handed to the cron scheduler.
pub fn automation_deps(state: &AppState) -> AutomationDeps {
    AutomationDeps {
        engine: state.engine.clone(),
        registry: state.registry.clone(),
        store: state.store.clone(),
        posting: state.config.posting.clone(),
        landing_page: state.config.brand.landing_page.clone(),
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - the API is deliberately open
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    // Rate limiting: 10 requests per second with bursts of 20 per IP
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers() // Extract IP from X-Forwarded-For header
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    Router::new()
        .route("/api/test", get(test_handler))
        .route("/api/status", get(status_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/generate-batch", post(generate_batch_handler))
        .route("/api/publish", post(publish_handler))
        .route("/api/test-facebook", post(facebook_test_handler))
        .route("/api/content", get(list_content_handler))
        .route("/api/content/:id", get(get_content_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/analytics", get(analytics_handler))
        .route("/api/schedule", post(schedule_handler))
        .route("/api/clear", post(clear_handler))
        .route("/api/system/pause", post(pause_handler))
        .route("/api/system/resume", post(resume_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(rate_limit_layer)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
}
