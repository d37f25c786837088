//! Prompt construction for the dialogue model.
//!
//! The system directive is a contract with [`dhuman_core::normalize`]: it
//! names the three JSON fields the normalizer reads and advertises exactly
//! the emotion and action vocabularies the normalizer accepts. Both lists are
//! rendered from [`Emotion::ALL`] and [`Action::ALL`], so they cannot drift.

use std::sync::LazyLock;

use serde_json::Value;

use dhuman_core::types::{Action, Emotion, Turn};

use crate::types::ChatMessage;

/// Directive template. `{emotions}` and `{actions}` are filled from the
/// core vocabularies.
pub const DIRECTIVE_TEMPLATE: &str = "你是一个驱动虚拟数字人的对话大脑。\
必须使用简体中文回答用户。\
请只输出一个 JSON 对象，包含三个字段：\
replyText（字符串，给用户的自然语言回答，要友好自然），\
emotion（字符串，取值限定为: {emotions}），\
action（字符串，取值限定为: {actions}）。\
不要输出 JSON 以外的任何文字。根据对话内容选择合适的情感和动作。";

/// Label prefixed to the serialized request metadata.
pub const META_LABEL: &str = "附加上下文信息（可选）：";

/// The rendered system directive.
pub static SYSTEM_DIRECTIVE: LazyLock<String> = LazyLock::new(|| {
    let emotions = Emotion::ALL.map(Emotion::as_str).join(", ");
    let actions = Action::ALL.map(Action::as_str).join(", ");
    render_template(
        DIRECTIVE_TEMPLATE,
        &[("emotions", &emotions), ("actions", &actions)],
    )
});

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Assemble the ordered message list for one remote call.
///
/// 1. the directive as a system message;
/// 2. each turn of `window`, role-tagged, content verbatim, in order;
/// 3. the current user text;
/// 4. if `meta` is present, a trailing system message carrying it as JSON.
///
/// `window` must hold only turns recorded *before* the current utterance,
/// otherwise the utterance appears twice.
#[must_use]
pub fn build_messages(
    directive: &str,
    window: &[Turn],
    user_text: &str,
    meta: Option<&Value>,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(window.len() + 3);
    messages.push(ChatMessage::system(directive));

    messages.extend(window.iter().map(|turn| ChatMessage {
        role: turn.role().into(),
        content: turn.content().to_string(),
    }));

    messages.push(ChatMessage::user(user_text));

    if let Some(meta) = meta {
        messages.push(ChatMessage::system(format!("{META_LABEL}{meta}")));
    }

    messages
}
