//! Turn orchestration: remote model first, local responder always behind it.
//!
//! ## Turn lifecycle
//!
//! ```text
//! Start ─▶ capture prompt window ─▶ record user turn ─┬─▶ RemotePath ─┬─▶ record reply ─▶ Delivered
//!                                                      │               │ (error/timeout/panic)
//!                                                      └─▶ LocalPath ◀─┘
//! ```
//!
//! The prompt window is captured *before* the user turn is recorded, so the
//! current utterance reaches the model exactly once. The reply is recorded
//! on every path, remote or local.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use dhuman_core::config::DhumanConfig;
use dhuman_core::normalize::normalize;
use dhuman_core::session::DEFAULT_PROMPT_WINDOW;
use dhuman_core::types::{ReplyResult, Role, Turn};
use dhuman_core::validation::session_key;
use dhuman_core::{LocalResponder, SessionStore};
use dhuman_llm::prompt::{SYSTEM_DIRECTIVE, build_messages};
use dhuman_llm::{CompletionClient, LlmClient, LlmError};

/// Knobs of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueSettings {
    /// Maximum number of past turns sent to the model.
    pub prompt_window: usize,
    /// Hard upper bound on one remote call.
    pub request_timeout: Duration,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            prompt_window: DEFAULT_PROMPT_WINDOW,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DialogueSettings {
    /// Settings derived from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &DhumanConfig) -> Self {
        Self {
            prompt_window: config.session.prompt_window,
            request_timeout: config.llm.request_timeout(),
        }
    }
}

/// Why a turn left the remote path.
#[derive(Debug, Error)]
enum Fallback {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("remote call exceeded {0:?}")]
    Deadline(Duration),

    #[error("remote call task failed: {0}")]
    Task(#[from] JoinError),
}

impl Fallback {
    fn kind(&self) -> &'static str {
        match self {
            Self::Llm(e) => e.kind(),
            Self::Deadline(_) => "deadline",
            Self::Task(_) => "task",
        }
    }
}

/// The dialogue pipeline for all sessions.
pub struct DialogueService {
    sessions: Arc<SessionStore>,
    responder: LocalResponder,
    client: Option<Arc<dyn CompletionClient>>,
    settings: DialogueSettings,
}

impl std::fmt::Debug for DialogueService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueService")
            .field("sessions", &self.sessions.session_count())
            .field("remote", &self.client.as_ref().map(|c| c.model().to_string()))
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl DialogueService {
    /// Assemble a service from its parts. `client = None` is local-only mode.
    #[must_use]
    pub fn new(
        sessions: Arc<SessionStore>,
        responder: LocalResponder,
        client: Option<Arc<dyn CompletionClient>>,
        settings: DialogueSettings,
    ) -> Self {
        Self {
            sessions,
            responder,
            client,
            settings,
        }
    }

    /// Build the production service: the remote path is enabled only when a
    /// credential is configured.
    #[must_use]
    pub fn from_config(config: &DhumanConfig) -> Self {
        let client: Option<Arc<dyn CompletionClient>> = match LlmClient::from_config(&config.llm) {
            Some(client) => {
                info!(
                    model = %config.llm.model,
                    base_url = %config.llm.base_url,
                    "Remote model enabled"
                );
                Some(Arc::new(client))
            }
            None => {
                info!("No API key configured, running in local-only mode");
                None
            }
        };

        Self::new(
            Arc::new(SessionStore::new(config.session.max_history_turns)),
            LocalResponder::new(),
            client,
            DialogueSettings::from_config(config),
        )
    }

    /// Whether turns try the remote model first.
    #[must_use]
    pub fn is_remote_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// The shared transcript store.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Process one validated user utterance and produce a reply.
    ///
    /// Never fails: every remote failure degrades to the local responder.
    /// A blank `session_id` is treated as absent, in which case nothing is
    /// recorded and the prompt carries no history.
    pub async fn submit_turn(
        &self,
        text: &str,
        session_id: Option<&str>,
        meta: Option<&Value>,
    ) -> ReplyResult {
        let session = session_key(session_id);
        let window = session
            .map(|id| self.sessions.recent_window(id, self.settings.prompt_window))
            .unwrap_or_default();

        if let Some(id) = session {
            self.sessions.append(id, Role::User, text);
        }

        let reply = match &self.client {
            Some(client) => match self.remote_reply(client, &window, text, meta).await {
                Ok(reply) => reply,
                Err(reason) => {
                    warn!(
                        kind = reason.kind(),
                        error = %reason,
                        "Remote reply failed, using local responder"
                    );
                    self.responder.respond(text)
                }
            },
            None => self.responder.respond(text),
        };

        if let Some(id) = session {
            self.sessions.append(id, Role::Assistant, reply.reply_text.clone());
        }

        debug!(
            session = session.unwrap_or("-"),
            emotion = %reply.emotion,
            action = %reply.action,
            "Turn delivered"
        );
        reply
    }

    /// Run the remote call on its own task under a hard deadline.
    async fn remote_reply(
        &self,
        client: &Arc<dyn CompletionClient>,
        window: &[Turn],
        text: &str,
        meta: Option<&Value>,
    ) -> Result<ReplyResult, Fallback> {
        let messages = build_messages(&SYSTEM_DIRECTIVE, window, text, meta);
        debug!(messages = messages.len(), model = client.model(), "Calling remote model");

        let client = Arc::clone(client);
        let mut task = tokio::spawn(async move { client.complete(&messages).await });

        let raw = match tokio::time::timeout(self.settings.request_timeout, &mut task).await {
            Ok(joined) => joined??,
            Err(_) => {
                task.abort();
                return Err(Fallback::Deadline(self.settings.request_timeout));
            }
        };

        Ok(normalize(&raw, text))
    }

    /// Transcript of a session, oldest first.
    #[must_use]
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.sessions.history(session_id)
    }

    /// Forget a session. Returns whether it existed.
    pub fn clear_session(&self, session_id: &str) -> bool {
        let cleared = self.sessions.clear(session_id);
        debug!(session = session_id, cleared, "Session cleared");
        cleared
    }
}
