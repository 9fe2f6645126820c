#![warn(missing_docs)]
//! # store-gate-core
//!
//! ## Purpose
//! Defines the pure session data model used across the `store-gate`
//! workspace.
//!
//! ## Responsibilities
//! - Represent the closed role set issued by the external Portal.
//! - Represent the user profile carried in handoffs and persisted records.
//! - Model a session that is either fully present or fully absent.
//!
//! ## Data flow
//! The Session Resolver decodes a [`UserProfile`] from a Portal handoff or
//! from persisted storage and pairs it with a bearer token in
//! [`ActiveSession`]; everything downstream consumes the resulting
//! [`Session`].
//!
//! ## Ownership and lifetimes
//! Profiles and tokens are owned (`String`) so storage, resolver, and guard
//! layers never share borrows across navigation boundaries.
//!
//! ## Error model
//! Constructor validation failures return [`CoreError`] variants. Wire
//! decoding is tolerant where the Portal is known to be sloppy (numeric
//! ids) and fail-closed where it matters (unrecognized roles).
//!
//! ## Security and privacy notes
//! Tokens are opaque values and are never transformed or logged by this
//! crate.
//!
//! ## Example
//! ```rust
//! use store_gate_core::{Role, Session};
//!
//! let session = Session::Absent;
//! assert!(session.user().is_none());
//! assert_eq!(serde_json::from_str::<Role>("\"admin\"").unwrap(), Role::Admin);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Closed role set issued by the Portal.
///
/// Any wire value outside the four known roles decodes to [`Role::Unknown`],
/// which the guard layer denies everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access, including admin surfaces.
    Superadmin,
    /// Administrative access to the admin surfaces only.
    Admin,
    /// Regular console user.
    User,
    /// Guest access, routed with regular users.
    Guest,
    /// Any unrecognized role value. Fail-closed: denied everywhere.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Returns `true` for the four roles the Portal is known to issue.
    pub fn is_known(self) -> bool {
        !matches!(self, Role::Unknown)
    }
}

/// User identity decoded from a Portal handoff or persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier. The Portal emits both string and numeric
    /// ids; numeric ids are accepted and stringified.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Role assigned by the Portal.
    pub role: Role,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    /// Department label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departemen: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telp: Option<String>,
    /// Badge number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Token echo attached by the Session Resolver for consumers that read
    /// the credential off the profile. Redundant with the session token by
    /// contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Number(i64),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(text) => text,
        IdRepr::Number(number) => number.to_string(),
    })
}

/// Fully populated session: a user identity plus its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    /// Resolved user profile.
    pub user: UserProfile,
    /// Opaque bearer token issued by the Portal.
    pub token: String,
}

impl ActiveSession {
    /// Constructs a validated session.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyToken`] when `token` is blank, so a present
    /// session can never carry a missing credential.
    pub fn new(user: UserProfile, token: impl Into<String>) -> Result<Self, CoreError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CoreError::EmptyToken);
        }

        Ok(Self { user, token })
    }
}

/// Session state for the current browser tab.
///
/// Invariant: a session is either fully present (user and non-empty token)
/// or fully absent. Half-populated sessions are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No session exists.
    Absent,
    /// A fully resolved session exists.
    Present(ActiveSession),
}

impl Session {
    /// Returns the current user, if a session is present.
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::Present(active) => Some(&active.user),
            Session::Absent => None,
        }
    }

    /// Returns the bearer token, if a session is present.
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Present(active) => Some(active.token.as_str()),
            Session::Absent => None,
        }
    }

    /// Returns `true` when a session is present.
    pub fn is_present(&self) -> bool {
        matches!(self, Session::Present(_))
    }
}

/// Error type for core model validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A present session cannot carry a blank token.
    #[error("session token is empty")]
    EmptyToken,
    /// JSON encoding/decoding error.
    #[error("profile codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
