#![warn(missing_docs)]
//! # store-gate-resolve
//!
//! ## Purpose
//! Resolves the current session on every top-level navigation: Portal
//! handoff parameters first, Persisted Record second, absent otherwise.
//!
//! ## Responsibilities
//! - Extract and decode `token`/`user` handoff query parameters.
//! - Persist a consumed handoff and direct the caller to strip the query
//!   string with a history replace.
//! - Fall back to the Persisted Record when no complete handoff exists.
//!
//! ## Data flow
//! Portal redirects the browser here with `?token=...&user=...` ->
//! [`resolve_session`] decodes, persists, and returns the session plus a
//! [`HistoryDirective`] -> the Route Guard evaluates the settled session.
//!
//! ## Ownership and lifetimes
//! Resolutions own their session data; nothing borrows from the URL or the
//! store across the resolve boundary.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors: malformed
//! handoffs and corrupt records degrade to the next resolution source and
//! never escape as errors.
//!
//! ## Security and privacy notes
//! The history directive exists so credentials never survive in the
//! visible URL; reloading the stripped URL re-resolves from storage only.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use store_gate_resolve::resolve_session;
//! use store_gate_storage::{MemoryStorage, TokenStore};
//! use url::Url;
//!
//! let store = TokenStore::new(Arc::new(MemoryStorage::new()));
//! let url = Url::parse("https://store.example/admin/dashboard").unwrap();
//! let resolution = resolve_session(&url, &store);
//! assert!(!resolution.session.is_present());
//! ```

use store_gate_core::{ActiveSession, Session, UserProfile};
use store_gate_storage::TokenStore;
use url::Url;

/// Handoff query parameter carrying the bearer token.
pub const PARAM_TOKEN: &str = "token";

/// Handoff query parameter carrying the URL-encoded user JSON.
pub const PARAM_USER: &str = "user";

/// Visible-URL rewrite the caller must apply after a consumed handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryDirective {
    /// Replace the current history entry (not push) with this URL, which
    /// is the original URL stripped of its query string.
    Replace(String),
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The settled session, possibly absent.
    pub session: Session,
    /// Set only when a handoff was consumed from the URL.
    pub history: Option<HistoryDirective>,
}

impl Resolution {
    /// Returns `true` when this resolution consumed a fresh Portal handoff.
    pub fn from_handoff(&self) -> bool {
        self.history.is_some()
    }
}

/// Resolves the session for `current_url`.
///
/// # Semantics
/// 1. A complete, decodable `token`/`user` handoff in the query string is
///    authoritative: it is persisted, the token is echoed onto the profile,
///    and the caller is directed to strip the query string via a history
///    replace.
/// 2. Otherwise the Persisted Record decides; the store self-heals half or
///    corrupt records.
/// 3. Otherwise the session is absent.
///
/// A handoff with either parameter missing, blank, or undecodable is
/// treated as no handoff at all. This function never fails and never
/// produces a half-populated session.
pub fn resolve_session(current_url: &Url, store: &TokenStore) -> Resolution {
    if let Some(session) = handoff_from_url(current_url) {
        // Persistence is best-effort: a failed write still leaves a usable
        // in-memory session for this navigation.
        let _ = store.write(&session);

        let mut stripped = current_url.clone();
        stripped.set_query(None);

        return Resolution {
            session: Session::Present(session),
            history: Some(HistoryDirective::Replace(stripped.to_string())),
        };
    }

    match store.read() {
        Some(session) => Resolution {
            session: Session::Present(session),
            history: None,
        },
        None => Resolution {
            session: Session::Absent,
            history: None,
        },
    }
}

/// Extracts a complete handoff from the query string, if one exists.
///
/// `Url::query_pairs` percent-decodes parameter values, so the `user`
/// payload arrives here as plain JSON text ready to parse.
fn handoff_from_url(url: &Url) -> Option<ActiveSession> {
    let mut token = None;
    let mut user_raw = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            PARAM_TOKEN => token = Some(value.into_owned()),
            PARAM_USER => user_raw = Some(value.into_owned()),
            _ => {}
        }
    }

    let token = token?;
    let user_raw = user_raw?;
    if token.trim().is_empty() {
        return None;
    }

    let mut user: UserProfile = serde_json::from_str(&user_raw).ok()?;
    user.token = Some(token.clone());
    ActiveSession::new(user, token).ok()
}
