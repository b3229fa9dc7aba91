use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use review_common::ReviewResult;

use super::form::UploadForm;
use crate::errors::ReviewError;
use crate::review::{ReviewOrchestrator, ReviewRequest};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub orchestrator: ReviewOrchestrator,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

impl From<ReviewError> for ApiError {
    fn from(e: ReviewError) -> Self {
        if e.is_validation() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Internal(format!("Gemini error: {}", e))
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/health", get(health))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

async fn upload(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReviewResult>, ApiError> {
    let form = UploadForm::read(multipart?).await?;
    let request = ReviewRequest::try_from(form).map_err(ReviewError::from)?;
    let result = state.orchestrator.run(request).await?;
    Ok(Json(result))
}
