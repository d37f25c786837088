//! HTTP boundary for the dialogue service.
//!
//! Thin by construction: decode, validate, call [`DialogueService`], encode.

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use dhuman_core::config::ServerConfig;

use crate::dialogue::DialogueService;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dialogue: Arc<DialogueService>,
    pub max_input_chars: usize,
}

impl AppState {
    pub fn new(dialogue: Arc<DialogueService>, max_input_chars: usize) -> Self {
        Self {
            dialogue,
            max_input_chars,
        }
    }
}

/// The full application: routes plus CORS and request tracing.
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    create_router(state)
        .layer(cors_layer(&server.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; a `*` entry allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
