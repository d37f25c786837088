//! Configuration for the dhuman service.
//!
//! Maps directly to `dhuman.toml`; every field has a default, so an empty
//! file (or no file at all) is a valid configuration. Environment variables
//! are layered on top through [`DhumanConfig::apply_env_overrides`].
//!
//! The configuration is read once at startup and passed explicitly to the
//! components that need it; nothing reads the environment afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DhumanError, Result};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "DHUMAN_CONFIG";

/// Top-level dhuman configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DhumanConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Remote chat-completion settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Session history settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// HTTP boundary settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl DhumanConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `DhumanError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| DhumanError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the process configuration: the file named by `DHUMAN_CONFIG`
    /// (if set), then environment overrides.
    ///
    /// # Errors
    /// Returns an error if the config file is unreadable or invalid, or an
    /// override cannot be parsed.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(std::path::Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Blank values are ignored. Recognized keys: `OPENAI_API_KEY`,
    /// `OPENAI_MODEL`, `OPENAI_BASE_URL`, `DHUMAN_REQUEST_TIMEOUT_MS`,
    /// `DHUMAN_HOST`, `DHUMAN_PORT`, `DHUMAN_ALLOWED_ORIGINS`,
    /// `DHUMAN_LOG_LEVEL`, `DHUMAN_LOG_FORMAT`.
    ///
    /// # Errors
    /// Returns `DhumanError::Config` if a numeric override does not parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(ms) = get("DHUMAN_REQUEST_TIMEOUT_MS") {
            self.llm.request_timeout_ms = parse_number("DHUMAN_REQUEST_TIMEOUT_MS", &ms)?;
        }
        if let Some(host) = get("DHUMAN_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("DHUMAN_PORT") {
            self.server.port = parse_number("DHUMAN_PORT", &port)?;
        }
        if let Some(origins) = get("DHUMAN_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(level) = get("DHUMAN_LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Some(format) = get("DHUMAN_LOG_FORMAT") {
            self.general.log_format = format;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| DhumanError::Config(format!("{key} must be a number, got '{value}'")))
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Remote chat-completion configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Bearer credential. Absent or blank disables the remote path entirely.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hard timeout for the single remote call, in milliseconds.
    #[serde(default = "default_30000")]
    pub request_timeout_ms: u64,
    /// Sampling temperature.
    #[serde(default = "default_0_7")]
    pub temperature: f32,
}

impl LlmConfig {
    /// Whether a usable credential is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// The remote call timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_ms: 30_000,
            temperature: 0.7,
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Session history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Turns of each role kept per session; the transcript holds twice this.
    #[serde(default = "default_20")]
    pub max_history_turns: usize,
    /// Most recent turns included in a remote prompt.
    #[serde(default = "default_10")]
    pub prompt_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history_turns: 20,
            prompt_window: 10,
        }
    }
}

/// HTTP boundary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. A `*` entry allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Maximum user text length after trimming, in characters.
    #[serde(default = "default_2000")]
    pub max_input_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            max_input_chars: 2000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_model() -> String { "gpt-3.5-turbo".to_string() }
fn default_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}
fn default_0_7() -> f32 { 0.7 }
fn default_10() -> usize { 10 }
fn default_20() -> usize { 20 }
fn default_2000() -> usize { 2000 }
fn default_30000() -> u64 { 30_000 }

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
