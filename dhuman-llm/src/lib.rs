//! # dhuman-llm: Chat-Completion Layer for dhuman
//!
//! Everything that talks to, or prepares input for, the remote language
//! model:
//!   - **Prompt building**: the fixed system directive plus a bounded slice
//!     of the session transcript, the current utterance and optional metadata.
//!   - **Completion client**: one bounded POST to an OpenAI-compatible
//!     `/chat/completions` endpoint, with failures classified for fallback.
//!
//! All calls go through the [`CompletionClient`] trait so the orchestrator
//! can be exercised against scripted clients.
//!
//! # Failure model
//!
//! ```text
//! timeout ───────────┐
//! transport error ───┼──▶ LlmError ──▶ caller falls back to the local responder
//! non-2xx / bad body ┘
//! ```
//!
//! There is no retry: a single attempt, bounded by the configured timeout.
//! Without a credential no client is built at all (see
//! [`LlmClient::from_config`]).

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{CompletionClient, LlmClient};
pub use error::LlmError;
pub use types::{ChatMessage, ChatRole};
