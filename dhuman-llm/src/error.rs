//! LLM error types.

use thiserror::Error;

/// Errors that can occur during a remote completion.
///
/// Every variant is recoverable by the caller through the local responder;
/// none of them reach the end user.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Request did not finish within the configured timeout.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// The request could not be sent or the connection failed.
    #[error("LLM transport error: {0}")]
    Transport(String),

    /// The endpoint answered, but not with a usable completion.
    #[error("LLM upstream error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream {
        /// HTTP status, when the failure was a non-success status.
        status: Option<u16>,
        /// What was wrong.
        message: String,
    },
}

impl LlmError {
    /// Upstream failure with a status code.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Upstream failure caused by a malformed success body.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Short, stable label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Upstream { .. } => "upstream",
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if let Some(status) = err.status() {
            LlmError::status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            LlmError::malformed(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}
