//! Content generation endpoints.

use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_client::Platform;
use uuid::Uuid;

use crate::kernel::store::GeneratedContent;
use crate::server::app::AppState;
use crate::server::routes::{parse_platforms, ApiError};

// The original MAX_POSTS_PER_BATCH
const BATCH_CAP: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub topic: Option<String>,
    pub platforms: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    success: bool,
    content: GeneratedContent,
    timestamp: DateTime<Utc>,
}

/// Generate one content item and queue it.
pub async fn generate_handler(
    Extension(state): Extension<AppState>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let platforms = parse_platforms(request.platforms.as_ref(), Platform::ALL.to_vec())?;

    let content = state
        .engine
        .generate(request.topic.as_deref(), &platforms)
        .await;

    tracing::info!(content_id = %content.id, source = %content.source, "Content generated");

    Ok(Json(GenerateResponse {
        success: true,
        content,
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBatchRequest {
    pub count: Option<usize>,
}

#[derive(Serialize)]
pub struct GenerateBatchResponse {
    success: bool,
    count: usize,
    items: Vec<BatchItem>,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct BatchItem {
    id: Uuid,
    topic: String,
    source: String,
    generated_at: DateTime<Utc>,
}

/// Generate a batch of items over random topics.
pub async fn generate_batch_handler(
    Extension(state): Extension<AppState>,
    body: Option<Json<GenerateBatchRequest>>,
) -> Result<Json<GenerateBatchResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let count = request
        .count
        .unwrap_or(state.config.posting.batch_size)
        .clamp(1, BATCH_CAP);

    let batch = state.engine.generate_batch(count, &Platform::ALL).await;

    let items = batch
        .into_iter()
        .map(|item| BatchItem {
            id: item.id,
            topic: item.topic,
            source: item.source,
            generated_at: item.generated_at,
        })
        .collect::<Vec<_>>();

    Ok(Json(GenerateBatchResponse {
        success: true,
        count: items.len(),
        items,
        timestamp: Utc::now(),
    }))
}
