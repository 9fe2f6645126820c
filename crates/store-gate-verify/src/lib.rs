#![warn(missing_docs)]
//! # store-gate-verify
//!
//! ## Purpose
//! Confirms bearer tokens against the external Portal's verification
//! endpoint.
//!
//! ## Responsibilities
//! - Validate the configured verify endpoint at construction.
//! - Execute the verification request through an injectable transport.
//! - Fail closed: every transport failure, non-2xx status, or unexpected
//!   body yields `false`, never an error to the caller.
//!
//! ## Data flow
//! Session Context asks [`PortalVerifier::verify`] before a persisted
//! session may enter a protected route; the verifier posts
//! `{"token": ...}` through [`VerifyTransport`] and inspects the decoded
//! status field.
//!
//! ## Ownership and lifetimes
//! The transport is shared via `Arc<dyn VerifyTransport>` so hosts and
//! tests inject their own HTTP stack.
//!
//! ## Error model
//! Construction-time endpoint violations surface as [`VerifyError`].
//! Runtime verification is deliberately infallible from the caller's view.
//!
//! ## Security and privacy notes
//! Token values are sent only to the configured endpoint and are never
//! logged by this crate.
//!
//! ## Example
//! ```rust
//! use store_gate_verify::validate_verify_endpoint;
//!
//! assert!(validate_verify_endpoint("https://portal.example/api/verify-token").is_ok());
//! assert!(validate_verify_endpoint("not a url").is_err());
//! ```

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Response status value the Portal uses for a live token.
pub const STATUS_VALID: &str = "valid";

/// Plain HTTP response snapshot returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by the verifier.
pub trait VerifyTransport: Send + Sync {
    /// Posts a JSON body to `endpoint` and returns the raw response.
    fn post_json(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, VerifyError>;
}

/// Expected shape of the Portal verification response body.
#[derive(Debug, Deserialize)]
struct VerifyResponseBody {
    status: String,
}

/// Verifier that posts tokens to the Portal and reads back a status.
#[derive(Clone)]
pub struct PortalVerifier {
    endpoint: String,
    transport: Arc<dyn VerifyTransport>,
}

impl PortalVerifier {
    /// Creates a validated verifier.
    ///
    /// # Errors
    /// Returns [`VerifyError::InvalidEndpoint`] when the endpoint is not an
    /// absolute HTTP(S) URL.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn VerifyTransport>,
    ) -> Result<Self, VerifyError> {
        let endpoint = endpoint.into();
        validate_verify_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Verifies a token against the Portal.
    ///
    /// # Semantics
    /// Returns `true` only when the transport reports a 2xx response whose
    /// JSON body carries `status == "valid"`. Blank tokens, transport
    /// failures, non-2xx statuses, undecodable bodies, and every other
    /// status value all return `false`.
    pub fn verify(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            return false;
        }

        let body = serde_json::json!({ "token": token });
        let response = match self.transport.post_json(&self.endpoint, &body) {
            Ok(response) => response,
            Err(_) => return false,
        };

        if !response.is_ok() {
            return false;
        }

        serde_json::from_str::<VerifyResponseBody>(&response.body)
            .map(|decoded| decoded.status == STATUS_VALID)
            .unwrap_or(false)
    }

    /// Returns the configured verify endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Validates the Portal verify endpoint constraints.
///
/// # Errors
/// Returns [`VerifyError::InvalidEndpoint`] for unparsable URLs or schemes
/// other than `http`/`https`.
pub fn validate_verify_endpoint(endpoint: &str) -> Result<(), VerifyError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| VerifyError::InvalidEndpoint(format!("invalid verify url: {error}")))?;

    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(VerifyError::InvalidEndpoint(
            "verify endpoint must use http or https".to_string(),
        ));
    }

    Ok(())
}

/// Errors produced by verifier construction and transports.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Endpoint violates URL or scheme requirements.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Transport failure reaching the Portal.
    #[error("verify transport failure: {0}")]
    Transport(String),
}
