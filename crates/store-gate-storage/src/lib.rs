#![warn(missing_docs)]
//! # store-gate-storage
//!
//! ## Purpose
//! Wraps the Persisted Record (the durable client-side copy of token and
//! user) behind a typed accessor so every read and write is centralized.
//!
//! ## Responsibilities
//! - Abstract the key/value storage surface through [`StorageBackend`].
//! - Enforce the both-or-neither record invariant on every read.
//! - Self-heal half or corrupt records by clearing them.
//! - Track session-scoped one-shot flags so logout can erase them too.
//!
//! ## Data flow
//! The Session Resolver writes a record after consuming a Portal handoff
//! and reads it back on later navigations; `logout` clears everything.
//!
//! ## Ownership and lifetimes
//! Backends are shared via `Arc<dyn StorageBackend>` so tests and hosts can
//! inject their own storage without lifetime coupling.
//!
//! ## Error model
//! Write-side codec failures surface as [`StorageError`]. Read-side
//! corruption is not an error: it resolves to an absent record after a
//! defensive clear.
//!
//! ## Security and privacy notes
//! Token values pass through this crate opaquely and are never logged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use store_gate_core::{ActiveSession, UserProfile};
use thiserror::Error;

/// Storage key holding the bearer token as plain text.
pub const KEY_TOKEN: &str = "token";

/// Storage key holding the user profile as JSON text.
pub const KEY_USER: &str = "user";

/// Key/value storage surface backing the Persisted Record.
///
/// Implementations mirror browser-local storage semantics: string keys,
/// string values, last write wins.
pub trait StorageBackend: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
    /// Removes `key` and its value, if present.
    fn remove(&self, key: &str);
}

/// In-memory backend used by tests and the text shell.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys. Test convenience.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("storage lock poisoned").len()
    }

    /// Returns `true` when no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .remove(key);
    }
}

/// Typed accessor for the Persisted Record.
///
/// The record is effectively single-writer (the Session Resolver and
/// logout); readers always re-parse instead of caching across navigations.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn StorageBackend>,
    session_flags: Vec<String>,
}

impl TokenStore {
    /// Creates a store over the given backend with no extra session flags.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            session_flags: Vec::new(),
        }
    }

    /// Registers session-scoped one-shot flag keys that logout must erase
    /// alongside the record itself.
    pub fn with_session_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Reads the Persisted Record.
    ///
    /// # Semantics
    /// Returns `Some` only for a complete, well-formed record. A record
    /// with one key missing, unparsable user JSON, or a blank token is
    /// cleared defensively and reported absent (never an error).
    pub fn read(&self) -> Option<ActiveSession> {
        let token = self.backend.get(KEY_TOKEN);
        let user_raw = self.backend.get(KEY_USER);

        let (Some(token), Some(user_raw)) = (token, user_raw) else {
            // Half a record is treated as no record at all.
            self.clear_record();
            return None;
        };

        let Ok(mut user) = serde_json::from_str::<UserProfile>(&user_raw) else {
            self.clear_record();
            return None;
        };

        user.token = Some(token.clone());
        match ActiveSession::new(user, token) {
            Ok(session) => Some(session),
            Err(_) => {
                self.clear_record();
                None
            }
        }
    }

    /// Writes a complete record: token as plain text, user as JSON text.
    ///
    /// # Errors
    /// Returns [`StorageError::Codec`] when the profile cannot be
    /// serialized.
    pub fn write(&self, session: &ActiveSession) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&session.user)?;
        self.backend.set(KEY_TOKEN, &session.token);
        self.backend.set(KEY_USER, &user_json);
        Ok(())
    }

    /// Removes the token and user keys only.
    pub fn clear_record(&self) {
        self.backend.remove(KEY_TOKEN);
        self.backend.remove(KEY_USER);
    }

    /// Removes the record plus every registered session-scoped flag.
    /// Logout path.
    pub fn clear_all(&self) {
        self.clear_record();
        for flag in &self.session_flags {
            self.backend.remove(flag);
        }
    }

    /// Returns the raw persisted token without validating the record.
    pub fn raw_token(&self) -> Option<String> {
        self.backend.get(KEY_TOKEN)
    }
}

/// Error type for record write failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON encoding error while persisting the user profile.
    #[error("record codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
