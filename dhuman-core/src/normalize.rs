//! Response normalization: the trust boundary for model output.
//!
//! The remote model is asked for a JSON object with `replyText`, `emotion`
//! and `action`, but nothing guarantees it complies. [`normalize`] turns any
//! raw completion text into a fully-populated [`ReplyResult`]; no other
//! component re-validates these fields.

use serde_json::Value;
use tracing::debug;

use crate::types::{Action, Emotion, ReplyResult};

/// Prefix of the reply used when the model returns an empty `replyText`.
pub const ECHO_PREFIX: &str = "你刚才说：";

/// Normalize raw completion content into a reply. Total: never fails.
///
/// - Content that is not a JSON object is used verbatim as the reply text,
///   with `neutral` / `idle`.
/// - An empty or missing `replyText` becomes an echo of `fallback_user_text`.
/// - An empty, missing or unknown `emotion` becomes `neutral`; likewise
///   `action` becomes `idle`.
#[must_use]
pub fn normalize(raw: &str, fallback_user_text: &str) -> ReplyResult {
    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!(
                kind = json_kind(&other),
                "Completion is JSON but not an object, using raw text"
            );
            return ReplyResult::new(raw, Emotion::Neutral, Action::Idle);
        }
        Err(e) => {
            debug!(error = %e, "Completion is not valid JSON, using raw text");
            return ReplyResult::new(raw, Emotion::Neutral, Action::Idle);
        }
    };

    let reply_text = field_text(object.get("replyText"));
    let reply_text = if reply_text.is_empty() {
        format!("{ECHO_PREFIX}{fallback_user_text}")
    } else {
        reply_text
    };

    let emotion_raw = field_text(object.get("emotion"));
    let emotion = emotion_raw.parse::<Emotion>().unwrap_or_else(|_| {
        if !emotion_raw.is_empty() {
            debug!(emotion = %emotion_raw, "Unknown emotion from model, defaulting");
        }
        Emotion::default()
    });

    let action_raw = field_text(object.get("action"));
    let action = action_raw.parse::<Action>().unwrap_or_else(|_| {
        if !action_raw.is_empty() {
            debug!(action = %action_raw, "Unknown action from model, defaulting");
        }
        Action::default()
    });

    ReplyResult::new(reply_text, emotion, action)
}

/// Render a JSON field as trimmed text. Strings are taken as-is, other
/// scalars are stringified, `null` and missing fields are empty.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_object_passes_through() {
        let reply = normalize(
            r#"{"replyText":"好的！","emotion":"happy","action":"shakeHead"}"#,
            "hi",
        );
        assert_eq!(reply, ReplyResult::new("好的！", Emotion::Happy, Action::ShakeHead));
    }

    #[test]
    fn non_json_is_used_verbatim() {
        let raw = "Sure! Here's a reply without JSON.";
        let reply = normalize(raw, "hi");
        assert_eq!(reply.reply_text, raw);
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.action, Action::Idle);
    }

    #[test]
    fn json_scalar_is_treated_as_text() {
        let reply = normalize("\"just a string\"", "hi");
        assert_eq!(reply.reply_text, "\"just a string\"");
        assert_eq!(reply.action, Action::Idle);

        let reply = normalize("[1, 2]", "hi");
        assert_eq!(reply.reply_text, "[1, 2]");
    }

    #[test]
    fn invalid_emotion_defaults_valid_action_kept() {
        let reply = normalize(r#"{"replyText":"ok","emotion":"bogus","action":"dance"}"#, "x");
        assert_eq!(reply.reply_text, "ok");
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.action, Action::Dance);
    }

    #[test]
    fn invalid_action_defaults() {
        let reply = normalize(r#"{"replyText":"ok","emotion":"sad","action":"backflip"}"#, "x");
        assert_eq!(reply.emotion, Emotion::Sad);
        assert_eq!(reply.action, Action::Idle);
    }

    #[test]
    fn fields_are_trimmed() {
        let reply = normalize(
            r#"{"replyText":"  hello  ","emotion":" angry ","action":"\tnod\n"}"#,
            "x",
        );
        assert_eq!(reply, ReplyResult::new("hello", Emotion::Angry, Action::Nod));
    }

    #[test]
    fn empty_reply_echoes_user_text() {
        let reply = normalize(r#"{"replyText":"   ","emotion":"happy"}"#, "今天好累");
        assert_eq!(reply.reply_text, "你刚才说：今天好累");
        assert_eq!(reply.emotion, Emotion::Happy);
        assert_eq!(reply.action, Action::Idle);
    }

    #[test]
    fn missing_fields_default() {
        let reply = normalize("{}", "abc");
        assert_eq!(reply, ReplyResult::new("你刚才说：abc", Emotion::Neutral, Action::Idle));
    }

    #[test]
    fn null_and_non_string_fields() {
        let reply = normalize(r#"{"replyText":42,"emotion":null,"action":true}"#, "x");
        assert_eq!(reply.reply_text, "42");
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.action, Action::Idle);
    }

    #[test]
    fn vocabulary_is_case_sensitive() {
        let reply = normalize(r#"{"replyText":"a","emotion":"HAPPY","action":"shakehead"}"#, "x");
        assert_eq!(reply.emotion, Emotion::Neutral);
        assert_eq!(reply.action, Action::Idle);
    }
}
