use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::kernel::store::QueueStats;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    uptime_seconds: i64,
    queue: QueueStats,
}

/// Health check endpoint
///
/// There is no database and no broker: once the process serves requests it
/// is healthy, so this always returns 200 with a small occupancy snapshot.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = (chrono::Utc::now() - state.started_at).num_seconds();

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds,
        queue: state.store.queue_stats(),
    })
}
