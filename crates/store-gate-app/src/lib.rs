#![warn(missing_docs)]
//! # store-gate-app
//!
//! ## Purpose
//! Orchestrates session resolution, verification, and route guarding for
//! the application-store console.
//!
//! ## Responsibilities
//! - Hold Portal configuration (verify endpoint, login page) with URL
//!   validation.
//! - Run the Session Context lifecycle: resolve on every navigation,
//!   re-verify persisted tokens on protected paths, guard, and translate
//!   guard decisions into concrete navigation targets.
//! - Clear the Persisted Record and bounce to Portal login on logout or
//!   failed verification.
//!
//! ## Data flow
//! Browser URL -> Session Resolver (settles fully first) -> optional Portal
//! re-verification -> Route Guard -> [`NavigationOutcome`] consumed by the
//! rendering shell.
//!
//! ## Ownership and lifetimes
//! The context owns its store, verifier, config, and policy table for the
//! lifetime of the tab. It is created on app mount; no teardown is needed
//! in a browser tab, but dropping it is always safe for tests.
//!
//! ## Error model
//! Only caller mistakes (unparsable navigation URL, bad configuration)
//! surface as [`AppError`]. Every protocol-level failure (malformed
//! handoff, corrupt record, rejected or unreachable verification) degrades
//! to a defined transition such as an absent session or a redirect, and
//! never escapes.
//!
//! ## Security and privacy notes
//! - Authentication is the Portal's exclusive responsibility: `login` is a
//!   deliberate no-op.
//! - Verification is never retried automatically; a fresh page load or a
//!   fresh Portal handoff is the only retry path.
//! - Token values never reach log output; free-form strings pass through
//!   [`redact_sensitive`] first.

use std::env;

use store_gate_core::{Role, Session, UserProfile};
use store_gate_guard::{GuardDecision, PolicyTable, UNAUTHORIZED_PATH, evaluate};
use store_gate_resolve::{HistoryDirective, resolve_session};
use store_gate_storage::TokenStore;
use store_gate_verify::{PortalVerifier, VerifyError, validate_verify_endpoint};
use thiserror::Error;
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("STORE_GATE_VERSION");

/// Environment variable naming the Portal verify endpoint.
pub const ENV_PORTAL_VERIFY_URL: &str = "STORE_GATE_PORTAL_VERIFY_URL";

/// Environment variable naming the Portal login page.
pub const ENV_PORTAL_LOGIN_URL: &str = "STORE_GATE_PORTAL_LOGIN_URL";

/// Query parameter carrying the return URL on a Portal login redirect.
pub const PARAM_REDIRECT: &str = "redirect";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Validated Portal endpoints consumed by the Session Context.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    verify_url: Url,
    login_url: Url,
}

impl PortalConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when either URL is not absolute
    /// HTTP(S).
    pub fn new(verify_url: &str, login_url: &str) -> Result<Self, AppError> {
        validate_verify_endpoint(verify_url)
            .map_err(|error| AppError::Config(error.to_string()))?;
        validate_verify_endpoint(login_url)
            .map_err(|error| AppError::Config(format!("login url: {error}")))?;

        // Both parses succeed after validation above.
        let verify_url = Url::parse(verify_url).map_err(|e| AppError::Config(e.to_string()))?;
        let login_url = Url::parse(login_url).map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            verify_url,
            login_url,
        })
    }

    /// Reads configuration from `STORE_GATE_PORTAL_VERIFY_URL` and
    /// `STORE_GATE_PORTAL_LOGIN_URL`.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when either variable is unset or
    /// invalid.
    pub fn from_env() -> Result<Self, AppError> {
        let verify_url = env::var(ENV_PORTAL_VERIFY_URL)
            .map_err(|_| AppError::Config(format!("{ENV_PORTAL_VERIFY_URL} is not set")))?;
        let login_url = env::var(ENV_PORTAL_LOGIN_URL)
            .map_err(|_| AppError::Config(format!("{ENV_PORTAL_LOGIN_URL} is not set")))?;
        Self::new(&verify_url, &login_url)
    }

    /// Returns the Portal verify endpoint.
    pub fn verify_url(&self) -> &str {
        self.verify_url.as_str()
    }

    /// Returns the Portal login page URL.
    pub fn login_url(&self) -> &str {
        self.login_url.as_str()
    }
}

/// Where the shell must take the browser after one navigation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Render the requested path.
    Render,
    /// In-app redirect to this path (role home or unauthorized page).
    Redirect(String),
    /// Full-page navigation to this external Portal URL.
    PortalLogin(String),
}

/// Outcome of one navigation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Visible-URL rewrite to apply first (handoff consumption), if any.
    pub history: Option<HistoryDirective>,
    /// Rendering or redirect decision for the requested path.
    pub action: NavigationAction,
}

/// Tab-scoped session holder: resolves, verifies, and guards on every
/// navigation, and owns logout.
pub struct SessionContext {
    config: PortalConfig,
    store: TokenStore,
    verifier: PortalVerifier,
    table: PolicyTable,
    session: Session,
    resolved_once: bool,
}

impl SessionContext {
    /// Creates a context on app mount. The session starts absent and
    /// [`SessionContext::loading`] stays `true` until the first
    /// [`SessionContext::navigate`] pass completes.
    pub fn new(
        config: PortalConfig,
        store: TokenStore,
        verifier: PortalVerifier,
        table: PolicyTable,
    ) -> Self {
        Self {
            config,
            store,
            verifier,
            table,
            session: Session::Absent,
            resolved_once: false,
        }
    }

    /// Returns the current session's user, if present.
    pub fn user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    /// Returns `true` until the first full resolution pass has completed.
    pub fn loading(&self) -> bool {
        !self.resolved_once
    }

    /// Deliberate no-op. Sessions are only ever established by a Portal
    /// handoff or by the resolver reading the Persisted Record; in-app form
    /// submissions must never mint one. Exists for interface symmetry.
    pub fn login(&mut self, _user: UserProfile) {
        tracing::debug!("login() ignored: Portal is the only authenticator");
    }

    /// Delegates to the Portal Verifier. Fail closed, never errors.
    pub fn verify_token(&self, token: &str) -> bool {
        self.verifier.verify(token)
    }

    /// Clears the in-memory session, the Persisted Record, and every
    /// session-scoped one-shot flag, then directs a full-page navigation to
    /// the Portal login page. Unconditional: safe to call from any session
    /// state, and the login URL carries no `redirect` parameter here.
    pub fn logout(&mut self) -> NavigationOutcome {
        self.session = Session::Absent;
        self.store.clear_all();
        tracing::info!("session cleared on logout");

        NavigationOutcome {
            history: None,
            action: NavigationAction::PortalLogin(self.config.login_url().to_string()),
        }
    }

    /// Runs one navigation pass for the current browser URL.
    ///
    /// # Semantics
    /// 1. The Session Resolver settles completely (storage writes and the
    ///    history directive included) before any guarding happens.
    /// 2. A storage-derived session entering a policy-protected path is
    ///    re-verified against the Portal first; rejection clears the record
    ///    and redirects to Portal login with the pre-redirect URL in the
    ///    `redirect` parameter. Fresh handoffs are authoritative and skip
    ///    this check for the navigation that consumed them.
    /// 3. The Route Guard decides; role-home and unauthorized targets come
    ///    back as in-app redirects, denial of an unauthenticated visitor as
    ///    a Portal login URL carrying the `redirect` parameter.
    ///
    /// `explicit_roles` is the route's own `allowed_roles` declaration and
    /// takes precedence over the prefix policy when present.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidUrl`] for an unparsable `current_url`.
    /// Protocol failures never surface here.
    pub fn navigate(
        &mut self,
        current_url: &str,
        explicit_roles: Option<&[Role]>,
    ) -> Result<NavigationOutcome, AppError> {
        let url = Url::parse(current_url)
            .map_err(|error| AppError::InvalidUrl(error.to_string()))?;
        let path = url.path().to_string();

        let resolution = resolve_session(&url, &self.store);
        let from_handoff = resolution.from_handoff();
        let history = resolution.history;
        self.session = resolution.session;

        // A consumed handoff already rewrote the visible URL, so any
        // Portal bounce must return to the stripped form, never to a URL
        // still carrying credentials.
        let return_url = match &history {
            Some(HistoryDirective::Replace(stripped)) => stripped.clone(),
            None => current_url.to_string(),
        };

        tracing::debug!(
            path = %path,
            from_handoff,
            present = self.session.is_present(),
            "session resolved"
        );

        if !from_handoff
            && self.table.is_protected(&path)
            && let Some(token) = self.session.token().map(str::to_owned)
            && !self.verifier.verify(&token)
        {
            tracing::warn!(path = %path, "portal rejected persisted token");
            self.store.clear_all();
            self.session = Session::Absent;
            self.resolved_once = true;

            return Ok(NavigationOutcome {
                history,
                action: NavigationAction::PortalLogin(
                    self.portal_login_with_redirect(&return_url),
                ),
            });
        }

        let decision = evaluate(&self.session, &path, explicit_roles, &self.table);
        self.resolved_once = true;

        let action = match decision {
            GuardDecision::Render => NavigationAction::Render,
            GuardDecision::RedirectRoleHome(home) => {
                tracing::debug!(path = %path, home = %home, "role-home correction");
                NavigationAction::Redirect(home)
            }
            GuardDecision::RedirectUnauthorized => {
                tracing::info!(path = %path, "explicit allow list rejected role");
                NavigationAction::Redirect(UNAUTHORIZED_PATH.to_string())
            }
            GuardDecision::RedirectPortalLogin => NavigationAction::PortalLogin(
                self.portal_login_with_redirect(&return_url),
            ),
        };

        Ok(NavigationOutcome { history, action })
    }

    fn portal_login_with_redirect(&self, target: &str) -> String {
        let mut login = self.config.login_url.clone();
        login
            .query_pairs_mut()
            .append_pair(PARAM_REDIRECT, target);
        login.to_string()
    }
}

/// Redacts common secret markers in log-safe output.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for key in ["password", "token", "authorization", "bearer"] {
        redacted = redact_key_value(&redacted, key);
    }
    redacted
}

fn redact_key_value(input: &str, key: &str) -> String {
    let lower = input.to_ascii_lowercase();
    if let Some(position) = lower.find(key) {
        let prefix = &input[..position];
        return format!("{prefix}{key}=<redacted>");
    }

    input.to_string()
}

/// App orchestration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Navigation URL could not be parsed.
    #[error("invalid navigation url: {0}")]
    InvalidUrl(String),
    /// Portal configuration missing or invalid.
    #[error("portal configuration error: {0}")]
    Config(String),
    /// Verifier construction error.
    #[error("verifier error: {0}")]
    Verify(#[from] VerifyError),
}
