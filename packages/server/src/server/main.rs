// Main entry point for the marketing API server

use anyhow::{Context, Result};
use marketing_core::server::{automation_deps, build_app, build_state};
use marketing_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marketing_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Real Mute Marketing API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        providers_configured = [
            config.claude_api_key.is_some(),
            config.openai_api_key.is_some(),
            config.gemini_api_key.is_some()
        ]
        .iter()
        .filter(|c| **c)
        .count(),
        interval_hours = config.posting.interval_hours,
        daily_limit = config.posting.daily_limit,
        "Configuration loaded"
    );

    // Build application state and router
    let state = build_state(config.clone());
    let app = build_app(state.clone());

    // Start scheduled tasks (auto-post, queue top-up, nightly trim)
    let _scheduler = marketing_core::kernel::start_scheduler(automation_deps(&state))
        .await
        .context("Failed to start scheduler")?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
