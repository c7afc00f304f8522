// HTTP routes
pub mod content;
pub mod generate;
pub mod health;
pub mod publish;
pub mod stats;
pub mod system;

pub use content::*;
pub use generate::*;
pub use health::*;
pub use publish::*;
pub use stats::*;
pub use system::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use social_client::Platform;

/// Handler-boundary error: everything unexpected becomes structured JSON.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    timestamp: chrono::DateTime<Utc>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.message, "Request failed");
        }
        (
            self.status,
            Json(ErrorBody {
                success: false,
                error: self.message,
                timestamp: Utc::now(),
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Resolve requested platform names, or hand back the default set.
pub(crate) fn parse_platforms(
    names: Option<&Vec<String>>,
    default: Vec<Platform>,
) -> Result<Vec<Platform>, ApiError> {
    let Some(names) = names else {
        return Ok(default);
    };
    if names.is_empty() {
        return Ok(default);
    }
    names
        .iter()
        .map(|name| {
            name.parse::<Platform>()
                .map_err(|e| ApiError::bad_request(e.to_string()))
        })
        .collect()
}
