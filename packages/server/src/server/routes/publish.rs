//! Publishing endpoints.

use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use social_client::Publisher;
use uuid::Uuid;

use crate::kernel::publish::publish_content;
use crate::kernel::store::PostRecord;
use crate::server::app::AppState;
use crate::server::routes::{parse_platforms, ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct PublishRequest {
    /// Queue item to publish; defaults to the oldest unpublished item.
    pub content_id: Option<Uuid>,
    pub platforms: Option<Vec<String>>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// True when at least one platform accepted the post.
    success: bool,
    content_id: Uuid,
    topic: String,
    results: Vec<PostRecord>,
    timestamp: DateTime<Utc>,
}

/// Publish a queue item to one or more platforms.
///
/// Results are per-platform; partial success is reported as-is, with
/// credential gaps showing up as structured failures.
pub async fn publish_handler(
    Extension(state): Extension<AppState>,
    body: Option<Json<PublishRequest>>,
) -> Result<Json<PublishResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let content = match request.content_id {
        Some(id) => state
            .store
            .content(id)
            .ok_or_else(|| ApiError::not_found(format!("Content {} not found", id)))?,
        None => state.store.next_unpublished().ok_or_else(|| {
            ApiError::bad_request("No ready content available. Generate some content first!")
        })?,
    };

    let platforms = parse_platforms(request.platforms.as_ref(), state.registry.platforms())?;
    let link = request
        .link
        .clone()
        .unwrap_or_else(|| state.config.brand.landing_page.clone());

    let results = publish_content(
        &state.registry,
        &state.store,
        &content,
        &platforms,
        Some(link.as_str()),
    )
    .await;

    Ok(Json(PublishResponse {
        success: results.iter().any(|r| r.success),
        content_id: content.id,
        topic: content.topic,
        results,
        timestamp: Utc::now(),
    }))
}

#[derive(Serialize)]
pub struct FacebookTestResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    details: serde_json::Value,
    timestamp: DateTime<Utc>,
}

/// Staged Facebook diagnostic: credentials, token validity, page access,
/// then an actual test post. Every stage reports inside a 200 body so the
/// caller sees exactly how far the setup got.
pub async fn facebook_test_handler(
    Extension(state): Extension<AppState>,
) -> Json<FacebookTestResponse> {
    let facebook = &state.facebook;
    let config = &state.config;

    if !facebook.is_configured() {
        return Json(FacebookTestResponse {
            success: false,
            message: None,
            error: Some("Facebook credentials not configured".to_string()),
            details: json!({
                "step": "credentials",
                "has_token": config.facebook_page_access_token.is_some(),
                "has_page_id": config.facebook_page_id.is_some(),
            }),
            timestamp: Utc::now(),
        });
    }

    let identity = match facebook.token_identity().await {
        Ok(identity) => identity,
        Err(e) => {
            return Json(FacebookTestResponse {
                success: false,
                message: None,
                error: Some("Facebook token invalid".to_string()),
                details: json!({ "step": "token_validation", "facebook_error": e.to_string() }),
                timestamp: Utc::now(),
            })
        }
    };

    let page = match facebook.page_info().await {
        Ok(page) => page,
        Err(e) => {
            return Json(FacebookTestResponse {
                success: false,
                message: None,
                error: Some("Cannot access Facebook page".to_string()),
                details: json!({
                    "step": "page_access",
                    "facebook_error": e.to_string(),
                    "account_name": identity.name,
                }),
                timestamp: Utc::now(),
            })
        }
    };

    let test_message = format!(
        "Test post from the {} marketing system\n\nAutomated posting check at {}\nVisit: {}",
        config.brand.name,
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        config.brand.website,
    );

    match facebook.publish(&test_message, None).await {
        Ok(post_id) => Json(FacebookTestResponse {
            success: true,
            message: Some("Facebook test completed successfully".to_string()),
            error: None,
            details: json!({
                "token_valid": true,
                "page_accessible": true,
                "post_created": true,
                "post_id": post_id,
                "account_name": identity.name,
                "page_name": page.name,
                "page_id": page.id,
                "page_followers": page.followers_count,
            }),
            timestamp: Utc::now(),
        }),
        Err(e) => Json(FacebookTestResponse {
            success: false,
            message: None,
            error: Some("Failed to create test post".to_string()),
            details: json!({
                "step": "post_creation",
                "token_valid": true,
                "page_accessible": true,
                "facebook_error": e.to_string(),
                "account_name": identity.name,
                "page_name": page.name,
            }),
            timestamp: Utc::now(),
        }),
    }
}
