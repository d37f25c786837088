//! Boundary validation for inbound dialogue requests.
//!
//! These checks run before the dialogue pipeline is invoked. Their failures
//! are the only caller-visible errors of a turn: once input passes here, the
//! pipeline always produces a reply.

use serde_json::Value;

use crate::error::{DhumanError, Result};

/// Trim user text and enforce the non-empty / length rules.
///
/// Length is counted in characters (Unicode scalar values), not bytes, so a
/// 2000-character limit means the same thing for Chinese and English input.
///
/// # Errors
/// `EmptyInput` if nothing remains after trimming, `InputTooLong` if the
/// trimmed text exceeds `max_chars`.
pub fn validate_user_text(text: &str, max_chars: usize) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DhumanError::EmptyInput);
    }

    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(DhumanError::InputTooLong {
            chars,
            max: max_chars,
        });
    }

    Ok(trimmed.to_string())
}

/// Accept request metadata only when it is a JSON object.
///
/// `null` is treated as absent.
///
/// # Errors
/// `InvalidMeta` for any other JSON value.
pub fn validate_meta(meta: Option<Value>) -> Result<Option<Value>> {
    match meta {
        None | Some(Value::Null) => Ok(None),
        Some(object @ Value::Object(_)) => Ok(Some(object)),
        Some(_) => Err(DhumanError::InvalidMeta),
    }
}

/// Treat a blank session id as no session at all.
#[must_use]
pub fn session_key(session_id: Option<&str>) -> Option<&str> {
    session_id.filter(|id| !id.trim().is_empty())
}
