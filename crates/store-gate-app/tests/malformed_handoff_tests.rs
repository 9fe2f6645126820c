//! Integration tests for fail-closed handling of malformed handoffs.

use std::sync::Arc;

use store_gate_app::NavigationAction;
use store_gate_storage::MemoryStorage;

mod common;
use common::{LOGIN_URL, accepting_context};

#[test]
fn malformed_handoff_tests_bad_user_json_resolves_like_no_query() {
    let backend = Arc::new(MemoryStorage::new());
    let mut context = accepting_context(backend.clone());

    let outcome = context
        .navigate(
            "https://store.example/user/dashboard?token=abc&user=%7Bnotjson",
            None,
        )
        .expect("navigation must not fail on malformed handoff");

    assert!(context.user().is_none());
    assert!(outcome.history.is_none(), "no handoff was consumed");
    match outcome.action {
        NavigationAction::PortalLogin(login) => {
            assert!(login.starts_with(LOGIN_URL));
        }
        other => panic!("expected portal login, got {other:?}"),
    }
    assert!(backend.is_empty(), "nothing may be persisted");
}

#[test]
fn malformed_handoff_tests_token_without_user_is_ignored() {
    let backend = Arc::new(MemoryStorage::new());
    let mut context = accepting_context(backend);

    context
        .navigate("https://store.example/?token=abc", None)
        .expect("navigation should succeed");

    assert!(context.user().is_none());
}

#[test]
fn malformed_handoff_tests_unknown_role_is_bounced_to_portal() {
    let backend = Arc::new(MemoryStorage::new());
    let mut context = accepting_context(backend);

    let url = common::handoff_url(
        "/user/dashboard",
        "tok-1",
        r#"{"id":"5","email":"x@store.test","role":"operator"}"#,
    );
    let outcome = context.navigate(&url, None).expect("navigation should succeed");

    assert!(matches!(outcome.action, NavigationAction::PortalLogin(_)));
}
