//! # dhuman Core Library
//!
//! Network-free building blocks of the digital-human dialogue pipeline:
//!
//! - **Types**: [`Turn`], [`ReplyResult`] and the closed [`Emotion`] /
//!   [`Action`] vocabularies the avatar front-end animates.
//! - **Sessions**: [`SessionStore`], a bounded per-session transcript map.
//! - **Local responder**: [`LocalResponder`], keyword rules that always
//!   produce a reply, used whenever the remote model cannot.
//! - **Normalization**: [`normalize::normalize`], the single trust boundary
//!   between untrusted model output and the rest of the system.
//! - **Validation**: boundary checks on user input.
//!
//! ## Pipeline
//!
//! ```text
//! user text ──▶ validation ──▶ SessionStore (user turn)
//!                                   │
//!                 credential? ──────┼──── no ──▶ LocalResponder ──┐
//!                                   │                             │
//!                                  yes                            │
//!                                   ▼                             │
//!                 remote completion (dhuman-llm)                  │
//!                     │ ok                │ err                   │
//!                     ▼                   └──▶ LocalResponder ────┤
//!                 normalize ─────────────────────────────────────▶┤
//!                                                                 ▼
//!                                         SessionStore (assistant turn)
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod normalize;
pub mod responder;
pub mod session;
pub mod types;
pub mod validation;

pub use config::DhumanConfig;
pub use error::{DhumanError, Result};
pub use responder::LocalResponder;
pub use session::SessionStore;
pub use types::*;
