#![warn(missing_docs)]
//! # store-gate-guard
//!
//! ## Purpose
//! Decides whether the current path may render for the current session.
//!
//! ## Responsibilities
//! - Hold the closed role->prefix policy table for the console route trees.
//! - Evaluate policies by longest matching prefix.
//! - Map each role to its fixed home path.
//! - Express the four-way guard outcome as explicit state, never as errors.
//!
//! ## Data flow
//! Session Context resolves a session, then calls [`evaluate`] on every
//! path change; the returned [`GuardDecision`] drives rendering or one of
//! the redirect flavors.
//!
//! ## Ownership and lifetimes
//! Policy tables own their data and are built once per route tree; guard
//! evaluation borrows everything and allocates only for redirect targets.
//!
//! ## Error model
//! Role mismatches are designed branches of the decision machine, not
//! errors. [`GuardError`] covers policy table construction only.
//!
//! ## Security and privacy notes
//! The policy world is closed: unknown roles and unlisted role/prefix
//! combinations are denied, and denial of an unauthenticated visitor always
//! routes through the Portal login rather than rendering anything.
//!
//! ## Example
//! ```rust
//! use store_gate_core::{Role, Session};
//! use store_gate_guard::{GuardDecision, PolicyTable, evaluate};
//!
//! let table = PolicyTable::standard();
//! let decision = evaluate(&Session::Absent, "/admin/dashboard", None, &table);
//! assert_eq!(decision, GuardDecision::RedirectPortalLogin);
//! ```

use store_gate_core::{Role, Session};
use thiserror::Error;

/// In-app path of the dedicated unauthorized page.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Home path for superadmin sessions.
pub const SUPERADMIN_HOME: &str = "/superadmin/dashboard";

/// Home path for admin sessions.
pub const ADMIN_HOME: &str = "/admin/dashboard";

/// Home path for user and guest sessions.
pub const USER_HOME: &str = "/user/dashboard";

/// Maps a role to its fixed home path.
///
/// Known non-admin roles land on the generic user dashboard. Callers must
/// gate [`Role::Unknown`] before using the result: unknown roles are denied
/// everywhere, so their "home" is the Portal login, not an in-app path.
pub fn role_home(role: Role) -> &'static str {
    match role {
        Role::Superadmin => SUPERADMIN_HOME,
        Role::Admin => ADMIN_HOME,
        Role::User | Role::Guest | Role::Unknown => USER_HOME,
    }
}

/// One route-tree policy: a path prefix and the roles allowed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Path prefix owning a whole route tree, e.g. `/admin`.
    pub prefix: String,
    /// Roles permitted to render under the prefix.
    pub allowed: Vec<Role>,
}

impl RoutePolicy {
    /// Constructs a validated policy.
    ///
    /// # Errors
    /// Returns [`GuardError::InvalidPrefix`] for prefixes that do not start
    /// with `/` or equal `/` (the root is governed separately), and
    /// [`GuardError::EmptyRoleSet`] for an empty allow list.
    pub fn new(prefix: impl Into<String>, allowed: Vec<Role>) -> Result<Self, GuardError> {
        let prefix = prefix.into();
        if !prefix.starts_with('/') || prefix == "/" {
            return Err(GuardError::InvalidPrefix(prefix));
        }
        if allowed.is_empty() {
            return Err(GuardError::EmptyRoleSet(prefix));
        }

        Ok(Self { prefix, allowed })
    }

    fn matches(&self, path: &str) -> bool {
        path == self.prefix
            || path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Closed-world policy table plus the public-path allowlist.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    routes: Vec<RoutePolicy>,
    public_paths: Vec<String>,
}

impl PolicyTable {
    /// Builds a table from explicit policies and public paths.
    ///
    /// The root path is always public for unauthenticated visitors and does
    /// not need to be listed.
    pub fn new(routes: Vec<RoutePolicy>, public_paths: Vec<String>) -> Self {
        Self {
            routes,
            public_paths,
        }
    }

    /// The fixed console table:
    /// `/superadmin` -> superadmin; `/admin` -> admin, superadmin;
    /// `/user` -> user, guest; no extra public pages.
    pub fn standard() -> Self {
        let routes = vec![
            RoutePolicy::new("/superadmin", vec![Role::Superadmin])
                .expect("static policy is valid"),
            RoutePolicy::new("/admin", vec![Role::Admin, Role::Superadmin])
                .expect("static policy is valid"),
            RoutePolicy::new("/user", vec![Role::User, Role::Guest])
                .expect("static policy is valid"),
        ];
        Self::new(routes, Vec::new())
    }

    /// Returns the longest-prefix policy governing `path`, if any.
    pub fn longest_match(&self, path: &str) -> Option<&RoutePolicy> {
        self.routes
            .iter()
            .filter(|policy| policy.matches(path))
            .max_by_key(|policy| policy.prefix.len())
    }

    /// Returns `true` when `path` sits under a declared policy prefix.
    pub fn is_protected(&self, path: &str) -> bool {
        self.longest_match(path).is_some()
    }

    /// Returns `true` when unauthenticated visitors may see `path`:
    /// exactly the root and the explicitly registered public pages.
    pub fn is_public(&self, path: &str) -> bool {
        path == "/" || self.public_paths.iter().any(|public| public == path)
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Outcome of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The path may render for this session.
    Render,
    /// Silent correction: send the session to its role home.
    RedirectRoleHome(String),
    /// The route's explicit allow list rejected this role: send to the
    /// dedicated unauthorized page.
    RedirectUnauthorized,
    /// No usable session for this path: full-page Portal login redirect.
    RedirectPortalLogin,
}

/// Evaluates the guard state machine for a settled session and path.
///
/// # Semantics
/// - No session: render only public paths, otherwise Portal login.
/// - Unknown role: Portal login (fail closed, loop free).
/// - Root path: unconditional role-home redirect, allowlists included.
/// - Explicit `allowed_roles` declared by the route wins over prefix
///   policy: pass renders, fail goes to the unauthorized page.
/// - Prefix policy: render when the role is listed, otherwise the silent
///   role-home correction.
/// - Paths outside every declared prefix render for any authenticated
///   session.
///
/// Callers must only invoke this after the Session Resolver has settled;
/// guarding a half-resolved session would redirect against stale state.
pub fn evaluate(
    session: &Session,
    path: &str,
    allowed_roles: Option<&[Role]>,
    table: &PolicyTable,
) -> GuardDecision {
    let Some(user) = session.user() else {
        return if table.is_public(path) {
            GuardDecision::Render
        } else {
            GuardDecision::RedirectPortalLogin
        };
    };

    let role = user.role;
    if !role.is_known() {
        return GuardDecision::RedirectPortalLogin;
    }

    if path == "/" {
        return GuardDecision::RedirectRoleHome(role_home(role).to_string());
    }

    if let Some(allowed) = allowed_roles {
        return if allowed.contains(&role) {
            GuardDecision::Render
        } else {
            GuardDecision::RedirectUnauthorized
        };
    }

    match table.longest_match(path) {
        Some(policy) if policy.allowed.contains(&role) => GuardDecision::Render,
        Some(_) => GuardDecision::RedirectRoleHome(role_home(role).to_string()),
        None => GuardDecision::Render,
    }
}

/// Errors produced by policy table construction.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Prefix must start with `/` and must not be the bare root.
    #[error("invalid route prefix: {0:?}")]
    InvalidPrefix(String),
    /// A policy must allow at least one role.
    #[error("route prefix {0:?} allows no roles")]
    EmptyRoleSet(String),
}
