//! HTTP request handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tracing::debug;

use dhuman_core::DhumanError;
use dhuman_core::types::ReplyResult;
use dhuman_core::validation::{validate_meta, validate_user_text};

use super::AppState;
use super::types::{ChatRequest, ClearResponse, ErrorResponse, HealthResponse, HistoryResponse};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/chat", post(chat))
        .route("/v1/sessions/:id/history", get(get_history))
        .route("/v1/sessions/:id", delete(clear_session))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        remote: state.dialogue.is_remote_enabled(),
    })
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResult>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let text = validate_user_text(&req.user_text, state.max_input_chars)?;
    let meta = validate_meta(req.meta)?;

    let reply = state
        .dialogue
        .submit_turn(&text, req.session_id.as_deref(), meta.as_ref())
        .await;

    Ok(Json(reply))
}

async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<HistoryResponse> {
    let messages = state
        .dialogue
        .history(&id)
        .into_iter()
        .map(Into::into)
        .collect();

    Json(HistoryResponse {
        session_id: id,
        messages,
    })
}

async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ClearResponse> {
    let cleared = state.dialogue.clear_session(&id);
    Json(ClearResponse {
        session_id: id,
        cleared,
    })
}

// ============================================================
// Error Handling
// ============================================================

/// A rejected request. Only boundary validation can fail a handler; the
/// dialogue pipeline itself always produces a reply.
#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
}

impl From<DhumanError> for AppError {
    fn from(err: DhumanError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::BadRequest(message) = self;
        debug!(%message, "Rejected request");
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    #[tokio::test]
    async fn validation_error_renders_as_bad_request_body() {
        let resp = AppError::from(DhumanError::InvalidMeta).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("JSON body");
        assert_eq!(body["error"], "meta must be a JSON object");
    }
}
