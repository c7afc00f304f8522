//! System report, status, pause/resume and clear endpoints.

use std::collections::BTreeMap;

use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use social_client::Platform;

use crate::kernel::store::{ProviderCounters, QueueStats};
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct SystemInfoResponse {
    success: bool,
    message: String,
    timestamp: DateTime<Utc>,
    system: SystemBlock,
    apis: BTreeMap<String, &'static str>,
    features: FeaturesBlock,
}

#[derive(Serialize)]
pub struct SystemBlock {
    status: &'static str,
    version: &'static str,
    environment: String,
}

#[derive(Serialize)]
pub struct FeaturesBlock {
    content_generation: bool,
    social_publishing: bool,
    analytics: bool,
    scheduling: bool,
}

fn presence(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "missing"
    }
}

/// Liveness plus credential-presence report.
pub async fn test_handler(Extension(state): Extension<AppState>) -> Json<SystemInfoResponse> {
    let config = &state.config;

    let mut apis = BTreeMap::new();
    apis.insert("claude".to_string(), presence(config.claude_api_key.is_some()));
    apis.insert("openai".to_string(), presence(config.openai_api_key.is_some()));
    apis.insert("gemini".to_string(), presence(config.gemini_api_key.is_some()));
    for (platform, configured) in state.registry.credential_report() {
        apis.insert(platform.to_string(), presence(configured));
    }

    Json(SystemInfoResponse {
        success: true,
        message: format!("{} marketing system is operational", config.brand.name),
        timestamp: Utc::now(),
        system: SystemBlock {
            status: "online",
            version: env!("CARGO_PKG_VERSION"),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()),
        },
        apis,
        features: FeaturesBlock {
            content_generation: true,
            social_publishing: true,
            analytics: true,
            scheduling: true,
        },
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    success: bool,
    status: &'static str,
    stats: QueueStats,
    provider_chain: Vec<&'static str>,
    providers: BTreeMap<String, ProviderCounters>,
    posted_today: usize,
    config: ConfigPresence,
}

#[derive(Serialize)]
pub struct ConfigPresence {
    claude_connected: bool,
    openai_connected: bool,
    gemini_connected: bool,
    platforms: BTreeMap<Platform, bool>,
}

/// Queue stats, counters and configuration presence.
pub async fn status_handler(Extension(state): Extension<AppState>) -> Json<StatusResponse> {
    let config = &state.config;
    let platforms: BTreeMap<Platform, bool> =
        state.registry.credential_report().into_iter().collect();

    Json(StatusResponse {
        success: true,
        status: if state.store.is_paused() {
            "paused"
        } else {
            "active"
        },
        stats: state.store.queue_stats(),
        provider_chain: state.engine.provider_names(),
        providers: state.store.provider_counters(),
        posted_today: state.store.posts_today(),
        config: ConfigPresence {
            claude_connected: config.claude_api_key.is_some(),
            openai_connected: config.openai_api_key.is_some(),
            gemini_connected: config.gemini_api_key.is_some(),
            platforms,
        },
    })
}

#[derive(Serialize)]
pub struct ToggleResponse {
    success: bool,
    status: &'static str,
}

pub async fn pause_handler(Extension(state): Extension<AppState>) -> Json<ToggleResponse> {
    state.store.set_paused(true);
    tracing::info!("System paused");
    Json(ToggleResponse {
        success: true,
        status: "paused",
    })
}

pub async fn resume_handler(Extension(state): Extension<AppState>) -> Json<ToggleResponse> {
    state.store.set_paused(false);
    tracing::info!("System resumed");
    Json(ToggleResponse {
        success: true,
        status: "active",
    })
}

#[derive(Serialize)]
pub struct ClearResponse {
    success: bool,
    message: String,
    cleared: ClearedCounts,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ClearedCounts {
    content_queue: usize,
    posts: usize,
    providers: usize,
}

/// Reset counters and empty the in-memory queues.
pub async fn clear_handler(Extension(state): Extension<AppState>) -> Json<ClearResponse> {
    let stats = state.store.queue_stats();
    let posts = state.store.recent_posts(usize::MAX).len();
    let providers = state.store.provider_counters().len();

    state.store.clear();
    tracing::info!("In-memory state cleared");

    Json(ClearResponse {
        success: true,
        message: "All data cleared successfully".to_string(),
        cleared: ClearedCounts {
            content_queue: stats.total,
            posts,
            providers,
        },
        timestamp: Utc::now(),
    })
}
