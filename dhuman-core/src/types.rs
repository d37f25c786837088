//! Core type definitions for the dialogue pipeline.
//!
//! Emotion and action are closed enumerations: any value that leaves the
//! core is legal by construction, so the front-end never sees a tag it
//! cannot animate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Roles & Turns
// ---------------------------------------------------------------------------

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human talking to the avatar.
    User,
    /// The avatar.
    Assistant,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current wall-clock time.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::at(role, content, Utc::now())
    }

    /// Create a turn with an explicit timestamp.
    #[must_use]
    pub fn at(role: Role, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at,
        }
    }

    /// Who produced this turn.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the turn was recorded.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// Emotion & Action vocabularies
// ---------------------------------------------------------------------------

/// Facial emotion the avatar should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Resting face.
    #[default]
    Neutral,
    /// Smiling.
    Happy,
    /// Raised brows.
    Surprised,
    /// Downcast.
    Sad,
    /// Frowning.
    Angry,
}

impl Emotion {
    /// The full vocabulary, in the order it is advertised to the model.
    pub const ALL: [Emotion; 5] = [
        Self::Neutral,
        Self::Happy,
        Self::Surprised,
        Self::Sad,
        Self::Angry,
    ];

    /// Wire name of the emotion.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Surprised => "surprised",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown emotion: '{s}'"))
    }
}

/// Body animation the avatar should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Standing still.
    #[default]
    Idle,
    /// Waving a hand.
    Wave,
    /// Greeting bow.
    Greet,
    /// Thinking pose.
    Think,
    /// Nodding.
    Nod,
    /// Shaking the head.
    ShakeHead,
    /// Dancing.
    Dance,
    /// Talking gestures.
    Speak,
}

impl Action {
    /// The full vocabulary, in the order it is advertised to the model.
    pub const ALL: [Action; 8] = [
        Self::Idle,
        Self::Wave,
        Self::Greet,
        Self::Think,
        Self::Nod,
        Self::ShakeHead,
        Self::Dance,
        Self::Speak,
    ];

    /// Wire name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Wave => "wave",
            Self::Greet => "greet",
            Self::Think => "think",
            Self::Nod => "nod",
            Self::ShakeHead => "shakeHead",
            Self::Dance => "dance",
            Self::Speak => "speak",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action: '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// The fully-populated result of one dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResult {
    /// Natural-language reply shown / spoken to the user.
    pub reply_text: String,
    /// Facial emotion.
    #[serde(default)]
    pub emotion: Emotion,
    /// Body animation.
    #[serde(default)]
    pub action: Action,
}

impl ReplyResult {
    /// Create a reply.
    #[must_use]
    pub fn new(reply_text: impl Into<String>, emotion: Emotion, action: Action) -> Self {
        Self {
            reply_text: reply_text.into(),
            emotion,
            action,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
