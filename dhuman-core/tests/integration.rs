//! Integration tests: end-to-end turn flows through the core building blocks
//! (configuration, validation, sessions, responder, normalizer), without a
//! network.

use std::io::Write;

use dhuman_core::config::DhumanConfig;
use dhuman_core::normalize::{ECHO_PREFIX, normalize};
use dhuman_core::responder::Intent;
use dhuman_core::types::{Action, Emotion, Role};
use dhuman_core::validation::{session_key, validate_meta, validate_user_text};
use dhuman_core::{DhumanError, LocalResponder, SessionStore};
use serde_json::json;

/// One local-path turn, wired the way the orchestrator does it.
fn local_turn(
    store: &SessionStore,
    responder: &LocalResponder,
    raw: &str,
    session: Option<&str>,
) -> String {
    let text = validate_user_text(raw, 2000).expect("valid input");
    let session = session_key(session);
    if let Some(id) = session {
        store.append(id, Role::User, text.as_str());
    }
    let reply = responder.respond(&text);
    if let Some(id) = session {
        store.append(id, Role::Assistant, reply.reply_text.clone());
    }
    reply.reply_text
}

// ---------------------------------------------------------------------------
// Config file → store sizing → bounded conversation
// ---------------------------------------------------------------------------

#[test]
fn configured_history_bound_holds_over_long_conversation() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[session]\nmax_history_turns = 3\n").expect("write");
    let config = DhumanConfig::from_file(file.path()).expect("load");

    let store = SessionStore::new(config.session.max_history_turns);
    let responder = LocalResponder::with_seed(3);

    for i in 0..10 {
        local_turn(&store, &responder, &format!("  第{i}句  "), Some("visitor"));
    }

    let history = store.history("visitor");
    assert_eq!(history.len(), 6);
    assert_eq!(history[0].role(), Role::User);
    assert_eq!(history[0].content(), "第7句", "input was trimmed and oldest evicted");
    assert_eq!(history[4].content(), "第9句");
}

// ---------------------------------------------------------------------------
// Boundary rejections leave no trace
// ---------------------------------------------------------------------------

#[test]
fn rejected_input_never_reaches_the_store() {
    let store = SessionStore::default();

    let empty = validate_user_text(" \u{3000}\n", 2000);
    assert!(matches!(empty, Err(DhumanError::EmptyInput)));

    let long = validate_user_text(&"好".repeat(2001), 2000);
    assert!(matches!(long, Err(ref e) if e.is_client_input()));

    let meta = validate_meta(Some(json!("scene")));
    assert!(matches!(meta, Err(DhumanError::InvalidMeta)));

    assert!(store.is_empty());
}

// ---------------------------------------------------------------------------
// Model output → normalizer → transcript
// ---------------------------------------------------------------------------

#[test]
fn normalized_model_reply_is_what_gets_recorded() {
    let store = SessionStore::default();
    store.append("s", Role::User, "你会跳舞吗");

    let raw = r#"{"replyText":"","emotion":"ecstatic","action":"dance"}"#;
    let reply = normalize(raw, "你会跳舞吗");
    store.append("s", Role::Assistant, reply.reply_text.clone());

    assert_eq!(reply.emotion, Emotion::Neutral);
    assert_eq!(reply.action, Action::Dance);
    assert_eq!(store.history("s")[1].content(), format!("{ECHO_PREFIX}你会跳舞吗"));
}

// ---------------------------------------------------------------------------
// Sessionless and multi-session flows
// ---------------------------------------------------------------------------

#[test]
fn sessionless_turns_still_answer() {
    let store = SessionStore::default();
    let responder = LocalResponder::with_seed(9);

    let reply = local_turn(&store, &responder, "hello there", None);
    assert!(Intent::Greeting.replies().iter().any(|(t, _, _)| *t == reply));
    assert!(store.is_empty());
}

#[test]
fn sessions_do_not_leak_into_each_other() {
    let store = SessionStore::default();
    let responder = LocalResponder::with_seed(11);

    local_turn(&store, &responder, "今天天气如何", Some("a"));
    local_turn(&store, &responder, "再见", Some("b"));

    assert_eq!(store.session_count(), 2);
    assert_eq!(store.history("a")[0].content(), "今天天气如何");
    assert_eq!(store.history("b")[0].content(), "再见");
    assert!(store.clear("a"));
    assert_eq!(store.len("b"), 2);
}
