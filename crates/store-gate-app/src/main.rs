#![warn(missing_docs)]
//! # store-gate binary
//!
//! Text shell for exercising navigation decisions by hand. Each CLI
//! argument is treated as a browser URL and run through one navigation
//! pass; the resolved action is printed. Verification runs against a stub
//! transport so the shell works offline, mirroring how hosts are expected
//! to wire a real HTTP client behind `VerifyTransport`.

use std::sync::Arc;

use store_gate_app::{
    NavigationAction, PortalConfig, SessionContext, app_version, redact_sensitive,
};
use store_gate_guard::PolicyTable;
use store_gate_storage::{MemoryStorage, TokenStore};
use store_gate_verify::{PortalVerifier, TransportResponse, VerifyError, VerifyTransport};
use tracing_subscriber::EnvFilter;

const DEFAULT_VERIFY_URL: &str = "https://portal.store.test/api/verify-token";
const DEFAULT_LOGIN_URL: &str = "https://portal.store.test/login";

/// Offline verification stub: tokens containing `stale` are rejected, so
/// storage-clearing redirects can be exercised without a live Portal.
struct StubVerifyTransport;

impl VerifyTransport for StubVerifyTransport {
    fn post_json(
        &self,
        _endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, VerifyError> {
        let token = body
            .get("token")
            .and_then(|value| value.as_str())
            .unwrap_or_default();

        let status = if token.contains("stale") {
            "expired"
        } else {
            "valid"
        };

        Ok(TransportResponse {
            status: 200,
            body: format!(r#"{{"status":"{status}"}}"#),
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = PortalConfig::from_env()
        .or_else(|_| PortalConfig::new(DEFAULT_VERIFY_URL, DEFAULT_LOGIN_URL));
    let config = match config {
        Ok(config) => config,
        Err(error) => {
            eprintln!("store-gate: {error}");
            std::process::exit(1);
        }
    };

    let verifier = match PortalVerifier::new(config.verify_url(), Arc::new(StubVerifyTransport)) {
        Ok(verifier) => verifier,
        Err(error) => {
            eprintln!("store-gate: {error}");
            std::process::exit(1);
        }
    };

    let store = TokenStore::new(Arc::new(MemoryStorage::new()));
    let mut context = SessionContext::new(config, store, verifier, PolicyTable::standard());

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        println!("store-gate {}", app_version());
        println!("usage: store-gate <url> [<url> ...]");
        return;
    }

    for url in urls {
        match context.navigate(&url, None) {
            Ok(outcome) => {
                println!("{}", redact_sensitive(&url));
                if let Some(directive) = &outcome.history {
                    println!("  history: {directive:?}");
                }
                match outcome.action {
                    NavigationAction::Render => println!("  render"),
                    NavigationAction::Redirect(path) => println!("  redirect {path}"),
                    NavigationAction::PortalLogin(login) => println!("  portal-login {login}"),
                }
            }
            Err(error) => eprintln!("store-gate: {error}"),
        }
    }
}
