//! # dhuman-server: Dialogue Service for dhuman
//!
//! Wires the core pipeline and the completion client into a running
//! service:
//!
//! - `dialogue`: the turn orchestrator ([`dialogue::DialogueService`]),
//!   remote-first with a local fallback that never fails.
//! - `api`: the axum HTTP boundary (chat, session history, health).
//!
//! ```text
//! HTTP ──▶ api ──▶ DialogueService ──┬─▶ CompletionClient ──▶ normalize
//!                       │            └─▶ LocalResponder
//!                       ▼
//!                  SessionStore
//! ```

pub mod api;
pub mod dialogue;

pub use dialogue::{DialogueService, DialogueSettings};
