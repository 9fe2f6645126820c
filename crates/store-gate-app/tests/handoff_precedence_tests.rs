//! Integration tests for handoff precedence over the persisted record.

use std::sync::Arc;

use store_gate_app::NavigationAction;
use store_gate_resolve::HistoryDirective;
use store_gate_storage::{KEY_TOKEN, MemoryStorage, StorageBackend};

mod common;
use common::{ADMIN_USER_JSON, accepting_context, handoff_url};

#[test]
fn handoff_precedence_tests_url_handoff_wins_over_storage() {
    let backend = Arc::new(MemoryStorage::new());
    backend.set(KEY_TOKEN, "tok-stale");
    backend.set(
        "user",
        r#"{"id":"1","email":"old@store.test","role":"user"}"#,
    );

    let mut context = accepting_context(backend.clone());
    let outcome = context
        .navigate(
            &handoff_url("/admin/dashboard", "tok-fresh", ADMIN_USER_JSON),
            None,
        )
        .expect("navigation should succeed");

    assert_eq!(outcome.action, NavigationAction::Render);
    let user = context.user().expect("session should be present");
    assert_eq!(user.email, "rani@store.test");
    assert_eq!(user.token.as_deref(), Some("tok-fresh"));
    assert_eq!(
        backend.get(KEY_TOKEN).as_deref(),
        Some("tok-fresh"),
        "handoff must overwrite the stale record"
    );
}

#[test]
fn handoff_precedence_tests_history_replace_strips_query() {
    let backend = Arc::new(MemoryStorage::new());
    let mut context = accepting_context(backend);

    let outcome = context
        .navigate(
            &handoff_url("/admin/dashboard", "tok-fresh", ADMIN_USER_JSON),
            None,
        )
        .expect("navigation should succeed");

    assert_eq!(
        outcome.history,
        Some(HistoryDirective::Replace(
            "https://store.example/admin/dashboard".to_string()
        ))
    );
}

#[test]
fn handoff_precedence_tests_reload_after_strip_yields_same_session() {
    let backend = Arc::new(MemoryStorage::new());
    let mut context = accepting_context(backend);

    context
        .navigate(
            &handoff_url("/admin/dashboard", "tok-fresh", ADMIN_USER_JSON),
            None,
        )
        .expect("first navigation should succeed");
    let first = context.user().cloned().expect("session after handoff");

    let outcome = context
        .navigate("https://store.example/admin/dashboard", None)
        .expect("reload should succeed");

    assert_eq!(outcome.action, NavigationAction::Render);
    assert!(outcome.history.is_none(), "no handoff on the reload");
    assert_eq!(context.user(), Some(&first));
}
