//! Volatile per-session transcripts.
//!
//! A [`SessionStore`] maps an opaque, caller-chosen session identifier to the
//! ordered transcript of that conversation. Transcripts are created lazily on
//! the first append and live until [`SessionStore::clear`] or process exit;
//! nothing expires on a timer.
//!
//! ## Bound
//!
//! A transcript never holds more than `2 × max_history_turns` entries
//! (one user and one assistant turn per exchange). Appending past the bound
//! evicts the oldest entries first.
//!
//! ## Concurrency
//!
//! Backed by a [`DashMap`]: every operation on one session id runs under that
//! id's shard lock, so an append is visible to the next read of the same id
//! and two appends never interleave. Sessions are independent; operations on
//! different ids only share a lock when they land on the same shard.

use dashmap::DashMap;
use tracing::debug;

use crate::types::{Role, Turn};

/// Default number of turns of each role kept per session.
pub const DEFAULT_MAX_HISTORY_TURNS: usize = 20;

/// Default number of recent turns handed to the prompt builder.
pub const DEFAULT_PROMPT_WINDOW: usize = 10;

/// In-memory session → transcript store.
#[derive(Debug)]
pub struct SessionStore {
    transcripts: DashMap<String, Vec<Turn>>,
    max_history_turns: usize,
}

impl SessionStore {
    /// Create a store keeping `max_history_turns` turns of each role.
    #[must_use]
    pub fn new(max_history_turns: usize) -> Self {
        Self {
            transcripts: DashMap::new(),
            max_history_turns,
        }
    }

    /// Maximum number of entries a single transcript may hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_history_turns.saturating_mul(2)
    }

    /// Append a turn stamped with the current time.
    ///
    /// Creates the transcript if absent and trims it to [`capacity`]
    /// afterwards. An empty `session_id` is ignored.
    ///
    /// [`capacity`]: Self::capacity
    pub fn append(&self, session_id: &str, role: Role, content: impl Into<String>) {
        self.push(session_id, Turn::new(role, content));
    }

    /// Append an already-built turn, with the same bound and empty-id rules
    /// as [`append`](Self::append).
    pub fn push(&self, session_id: &str, turn: Turn) {
        if session_id.is_empty() {
            debug!("Ignoring append for empty session id");
            return;
        }

        let capacity = self.capacity();
        let mut transcript = self.transcripts.entry(session_id.to_string()).or_default();
        transcript.push(turn);

        if transcript.len() > capacity {
            let excess = transcript.len() - capacity;
            transcript.drain(..excess);
            debug!(session_id, evicted = excess, "Transcript trimmed to capacity");
        }
    }

    /// The last `k` turns of a session, oldest first.
    ///
    /// Empty if the session is unknown. Never mutates.
    #[must_use]
    pub fn recent_window(&self, session_id: &str, k: usize) -> Vec<Turn> {
        self.transcripts
            .get(session_id)
            .map(|transcript| {
                let start = transcript.len().saturating_sub(k);
                transcript[start..].to_vec()
            })
            .unwrap_or_default()
    }

    /// The full stored transcript, oldest first. Empty if unknown.
    #[must_use]
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.transcripts
            .get(session_id)
            .map(|transcript| transcript.value().clone())
            .unwrap_or_default()
    }

    /// Remove a session's transcript. Returns whether it existed.
    pub fn clear(&self, session_id: &str) -> bool {
        let existed = self.transcripts.remove(session_id).is_some();
        if existed {
            debug!(session_id, "Session cleared");
        }
        existed
    }

    /// Number of entries stored for a session.
    #[must_use]
    pub fn len(&self, session_id: &str) -> usize {
        self.transcripts.get(session_id).map_or(0, |t| t.len())
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.transcripts.len()
    }

    /// Whether no session has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_TURNS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn contents(turns: &[Turn]) -> Vec<&str> {
        turns.iter().map(Turn::content).collect()
    }

    #[test]
    fn append_creates_session_lazily() {
        let store = SessionStore::default();
        assert!(store.is_empty());

        store.append("s1", Role::User, "你好");
        assert_eq!(store.session_count(), 1);
        assert_eq!(store.len("s1"), 1);
        assert_eq!(store.history("s1")[0].role(), Role::User);
    }

    #[test]
    fn empty_session_id_is_noop() {
        let store = SessionStore::default();
        store.append("", Role::User, "ignored");
        assert!(store.is_empty());
    }

    #[test]
    fn transcript_is_bounded_fifo() {
        let store = SessionStore::new(2);
        for i in 0..7 {
            store.append("s", Role::User, format!("m{i}"));
        }
        let history = store.history("s");
        assert_eq!(history.len(), 4);
        assert_eq!(contents(&history), vec!["m3", "m4", "m5", "m6"]);
    }

    #[test]
    fn default_capacity_is_forty() {
        let store = SessionStore::default();
        assert_eq!(store.capacity(), 40);
        for i in 0..45 {
            store.append("s", Role::Assistant, i.to_string());
        }
        let history = store.history("s");
        assert_eq!(history.len(), 40);
        assert_eq!(history[0].content(), "5");
        assert_eq!(history[39].content(), "44");
    }

    #[test]
    fn recent_window_returns_tail_oldest_first() {
        let store = SessionStore::default();
        for i in 0..5 {
            store.append("s", Role::User, format!("m{i}"));
        }
        assert_eq!(contents(&store.recent_window("s", 3)), vec!["m2", "m3", "m4"]);
        assert_eq!(store.recent_window("s", 10).len(), 5);
        assert!(store.recent_window("s", 0).is_empty());
        assert!(store.recent_window("unknown", 10).is_empty());
        assert_eq!(store.len("s"), 5, "reading must not mutate");
    }

    #[test]
    fn clear_reports_existence() {
        let store = SessionStore::default();
        assert!(!store.clear("missing"));

        store.append("s", Role::User, "hello");
        assert!(store.clear("s"));
        assert!(store.history("s").is_empty());
        assert!(!store.clear("s"));
    }

    #[test]
    fn history_is_idempotent() {
        let store = SessionStore::default();
        store.append("s", Role::User, "a");
        store.append("s", Role::Assistant, "b");
        assert_eq!(store.history("s"), store.history("s"));
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::default();
        store.append("a", Role::User, "for a");
        store.append("b", Role::User, "for b");
        store.clear("a");
        assert_eq!(contents(&store.history("b")), vec!["for b"]);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let store = Arc::new(SessionStore::new(1000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.append("shared", Role::User, format!("{t}-{i}"));
                        store.append(&format!("own-{t}"), Role::User, i.to_string());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread panicked");
        }

        assert_eq!(store.len("shared"), 400);
        for t in 0..8 {
            let own = store.history(&format!("own-{t}"));
            let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
            assert_eq!(contents(&own), expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
