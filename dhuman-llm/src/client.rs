//! Remote completion client for OpenAI-compatible chat endpoints.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use dhuman_core::config::LlmConfig;

use crate::error::LlmError;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Longest slice of an error body kept in an [`LlmError`].
const ERROR_BODY_LIMIT: usize = 512;

/// The seam between the dialogue orchestrator and the remote model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion and return the first choice's content as opaque text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Model identifier used for requests.
    fn model(&self) -> &str;
}

/// reqwest-backed [`CompletionClient`] for an OpenAI-compatible endpoint
/// (OpenAI, DeepSeek, Qwen, vLLM, ...): one POST per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    base_url: String,
    api_key: String,
    http: Client,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Create a client for an OpenAI-compatible endpoint.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http: Client::new(),
            model: model.into(),
            temperature,
            timeout,
        }
    }

    /// Build a client from configuration, or `None` when no credential is
    /// configured (local-only mode).
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        if !config.has_credential() {
            return None;
        }
        let key = config.api_key.as_deref()?.trim();
        Some(Self::new(
            config.base_url.clone(),
            key,
            config.model.clone(),
            config.temperature,
            config.request_timeout(),
        ))
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Classify a reqwest failure, filling in the configured timeout.
    fn classify(&self, err: reqwest::Error) -> LlmError {
        match LlmError::from(err) {
            LlmError::Timeout(_) => LlmError::Timeout(self.timeout_ms()),
            other => other,
        }
    }

    async fn complete_openai(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        debug!(%url, model = %self.model, messages = messages.len(), "Sending chat completion");

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(LlmError::status(status.as_u16(), snippet));
        }

        let parsed: ChatCompletionResponse =
            resp.json().await.map_err(|e| match self.classify(e) {
                LlmError::Timeout(ms) => LlmError::Timeout(ms),
                other => LlmError::malformed(other.to_string()),
            })?;

        let content = parsed
            .first_content()
            .ok_or_else(|| LlmError::malformed("response has no choices[0].message.content"))?
            .to_string();

        info!(
            model = %self.model,
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            completion_tokens = parsed.usage.map(|u| u.completion_tokens),
            "Chat completion succeeded"
        );

        Ok(content)
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let start = Instant::now();
        let result = self.complete_openai(messages).await;

        if let Err(e) = &result {
            warn!(
                model = %self.model,
                kind = e.kind(),
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                error = %e,
                "Chat completion failed"
            );
        }
        result
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_without_key_builds_no_client() {
        assert!(LlmClient::from_config(&LlmConfig::default()).is_none());

        let blank = LlmConfig {
            api_key: Some("   ".into()),
            ..LlmConfig::default()
        };
        assert!(LlmClient::from_config(&blank).is_none());
    }

    #[test]
    fn config_with_key_builds_client() {
        let config = LlmConfig {
            api_key: Some(" sk-test ".into()),
            request_timeout_ms: 1500,
            ..LlmConfig::default()
        };
        let client = LlmClient::from_config(&config).expect("credential configured");
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = LlmClient::new("http://x", "sk-secret", "m", 0.7, Duration::from_secs(1));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("http://x"));
    }
}
