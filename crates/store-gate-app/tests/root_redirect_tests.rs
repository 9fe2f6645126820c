//! Integration tests for the unconditional root redirect.

use std::sync::Arc;

use store_gate_app::NavigationAction;
use store_gate_storage::{KEY_TOKEN, KEY_USER, MemoryStorage, StorageBackend};

mod common;
use common::accepting_context;

#[test]
fn root_redirect_tests_each_role_lands_on_its_home() {
    let cases = [
        ("superadmin", "/superadmin/dashboard"),
        ("admin", "/admin/dashboard"),
        ("user", "/user/dashboard"),
        ("guest", "/user/dashboard"),
    ];

    for (role, home) in cases {
        let backend = Arc::new(MemoryStorage::new());
        backend.set(KEY_TOKEN, "tok-1");
        backend.set(
            KEY_USER,
            &format!(r#"{{"id":"1","email":"x@store.test","role":"{role}"}}"#),
        );
        let mut context = accepting_context(backend);

        let outcome = context
            .navigate("https://store.example/", None)
            .expect("navigation should succeed");

        assert_eq!(
            outcome.action,
            NavigationAction::Redirect(home.to_string()),
            "role {role} must land on {home}"
        );
    }
}

#[test]
fn root_redirect_tests_unauthenticated_root_renders() {
    let backend = Arc::new(MemoryStorage::new());
    let mut context = accepting_context(backend);

    let outcome = context
        .navigate("https://store.example/", None)
        .expect("navigation should succeed");

    assert_eq!(outcome.action, NavigationAction::Render);
}
