//! Wire types for OpenAI-compatible chat completions.

use serde::{Deserialize, Serialize};

use dhuman_core::types::Role;

/// Role tag of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions to the model.
    System,
    /// Human input.
    User,
    /// Earlier model output.
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
        }
    }
}

/// One role-tagged message of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who is speaking.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST {base}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Prompt messages, in order.
    pub messages: &'a [ChatMessage],
    /// Sampling temperature.
    pub temperature: f32,
}

/// The subset of a chat-completion response this service reads.
///
/// Every level is optional so that a structurally incomplete body still
/// deserializes and can be reported as an upstream error rather than a
/// decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    /// Candidate completions.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token accounting, when the provider reports it.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Content of the first choice's message, if present.
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    /// The generated message.
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Message of a candidate completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_openai_shape() {
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("你好")];
        let body = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.5,
        };
        assert_eq!(
            serde_json::to_value(&body).expect("serialize"),
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "rules"},
                    {"role": "user", "content": "你好"},
                ],
                "temperature": 0.5,
            })
        );
    }

    #[test]
    fn first_content_reads_first_choice() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "x",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "one"}},
                {"index": 1, "message": {"role": "assistant", "content": "two"}},
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13},
        }))
        .expect("deserialize");
        assert_eq!(resp.first_content(), Some("one"));
        assert_eq!(resp.usage.map(|u| u.completion_tokens), Some(3));
    }

    #[test]
    fn structural_absence_yields_none() {
        for body in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": {}}]}),
        ] {
            let resp: ChatCompletionResponse = serde_json::from_value(body).expect("deserialize");
            assert_eq!(resp.first_content(), None);
        }
    }

    #[test]
    fn role_maps_from_turn_role() {
        assert_eq!(ChatRole::from(Role::User), ChatRole::User);
        assert_eq!(ChatRole::from(Role::Assistant), ChatRole::Assistant);
    }
}
