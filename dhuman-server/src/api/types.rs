//! Request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dhuman_core::types::{Role, Turn};

/// `POST /v1/chat` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_text: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub remote: bool,
}

/// One transcript entry as exposed over HTTP.
#[derive(Debug, Serialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
}

impl From<Turn> for HistoryMessage {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<HistoryMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub session_id: String,
    pub cleared: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
