//! Shared fixtures for app integration tests.
//!
//! Each integration test binary compiles this module independently, so
//! items unused by one binary are still needed by another.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use store_gate_app::{PortalConfig, SessionContext};
use store_gate_guard::PolicyTable;
use store_gate_storage::{MemoryStorage, TokenStore};
use store_gate_verify::{PortalVerifier, TransportResponse, VerifyError, VerifyTransport};

/// Portal login page used by every fixture context.
pub const LOGIN_URL: &str = "https://portal.store.test/login";

/// Portal verify endpoint used by every fixture context.
pub const VERIFY_URL: &str = "https://portal.store.test/api/verify-token";

/// Canonical user JSON for handoff fixtures.
pub const ADMIN_USER_JSON: &str =
    r#"{"id":"3","email":"rani@store.test","role":"admin","nama":"Rani"}"#;

/// Scripted verify transport recording every call.
pub struct ScriptedTransport {
    verdict: &'static str,
    fail_transport: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Transport whose Portal always reports the given status value.
    pub fn reporting(verdict: &'static str) -> Self {
        Self {
            verdict,
            fail_transport: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Transport that fails at the network layer.
    pub fn unreachable() -> Self {
        Self {
            verdict: "valid",
            fail_transport: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of verification calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("call log lock").len()
    }
}

impl VerifyTransport for ScriptedTransport {
    fn post_json(
        &self,
        _endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, VerifyError> {
        let token = body
            .get("token")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        self.calls.lock().expect("call log lock").push(token);

        if self.fail_transport {
            return Err(VerifyError::Transport("connection refused".to_string()));
        }

        Ok(TransportResponse {
            status: 200,
            body: format!(r#"{{"status":"{}"}}"#, self.verdict),
        })
    }
}

/// Builds a context over the given backend and transport.
pub fn context_with(
    backend: Arc<MemoryStorage>,
    transport: Arc<ScriptedTransport>,
) -> SessionContext {
    let config = PortalConfig::new(VERIFY_URL, LOGIN_URL).expect("fixture config");
    let store = TokenStore::new(backend).with_session_flags(["greeted"]);
    let verifier = PortalVerifier::new(VERIFY_URL, transport).expect("fixture verifier");
    SessionContext::new(config, store, verifier, PolicyTable::standard())
}

/// Builds a context whose Portal accepts every token.
pub fn accepting_context(backend: Arc<MemoryStorage>) -> SessionContext {
    context_with(backend, Arc::new(ScriptedTransport::reporting("valid")))
}

/// Builds a handoff URL for the given path, token, and user JSON.
pub fn handoff_url(path: &str, token: &str, user_json: &str) -> String {
    let mut url = url::Url::parse("https://store.example/").expect("base url");
    url.set_path(path);
    url.query_pairs_mut()
        .append_pair("token", token)
        .append_pair("user", user_json);
    url.to_string()
}
