//! Error types for the dhuman core library.

use thiserror::Error;

/// Top-level error type for core operations.
///
/// Only configuration loading and boundary validation can fail; the dialogue
/// pipeline itself is total and never surfaces an error to the caller.
#[derive(Error, Debug)]
pub enum DhumanError {
    /// User text was empty after trimming.
    #[error("userText must not be empty")]
    EmptyInput,

    /// User text exceeded the configured length limit.
    #[error("userText too long: {chars} chars (max: {max})")]
    InputTooLong {
        /// Length of the trimmed input, in characters.
        chars: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Request metadata was present but not a JSON object.
    #[error("meta must be a JSON object")]
    InvalidMeta,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DhumanError {
    /// Whether this error was caused by caller input rather than the service.
    #[must_use]
    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InputTooLong { .. } | Self::InvalidMeta
        )
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, DhumanError>;
