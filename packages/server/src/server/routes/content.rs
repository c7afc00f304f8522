//! Content queue listing endpoints.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::store::GeneratedContent;
use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Only items carrying text for this platform.
    pub platform: Option<String>,
}

#[derive(Serialize)]
pub struct ContentListResponse {
    success: bool,
    content: Vec<GeneratedContent>,
    pagination: Pagination,
}

#[derive(Serialize)]
pub struct Pagination {
    page: usize,
    limit: usize,
    total: usize,
    pages: usize,
}

/// Paginated queue listing, newest first.
pub async fn list_content_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ContentListResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let mut content = state.store.recent_content();
    if let Some(platform) = &query.platform {
        let platform = platform
            .parse::<social_client::Platform>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        content.retain(|item| item.texts.contains_key(&platform));
    }

    let total = content.len();
    let pages = total.div_ceil(limit);
    let content = content
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(Json(ContentListResponse {
        success: true,
        content,
        pagination: Pagination {
            page,
            limit,
            total,
            pages,
        },
    }))
}

/// Fetch one queue item by id.
pub async fn get_content_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedContent>, ApiError> {
    state
        .store
        .content(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Content not found"))
}
