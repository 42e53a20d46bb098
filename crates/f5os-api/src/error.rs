use thiserror::Error;

use crate::interfaces::ReconcileStep;

/// Top-level error type for the `f5os-api` crate.
///
/// Covers every failure mode of a session: login, transport, structured
/// RESTCONF errors, and aborted interface reconciliation.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected with HTTP 401. Carries the status line and raw body.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A token or caller-supplied header is not a valid header value.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },

    // ── RESTCONF ────────────────────────────────────────────────────
    /// First entry of an `ietf-restconf:errors` envelope.
    #[error("RESTCONF error (HTTP {status}): {message}")]
    Api {
        status: u16,
        error_type: Option<String>,
        error_tag: Option<String>,
        error_path: Option<String>,
        message: String,
    },

    /// Failing status whose body carried no usable error envelope.
    #[error("HTTP {status} with no RESTCONF error entry: {body}")]
    Status { status: u16, body: String },

    /// Status outside the success, not-found and error classes.
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Reconciliation ──────────────────────────────────────────────
    /// Interface update aborted after some mutations were applied.
    ///
    /// The device is left in the state described by `completed`; there
    /// is no rollback. Re-read the interface before retrying.
    #[error("Interface update aborted after {} step(s): {source}", completed.len())]
    PartialUpdate {
        completed: Vec<ReconcileStep>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Returns `true` if this error indicates the token was rejected
    /// and a new session might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Api { status, .. } | Self::Status { status, .. } => *status == 401,
            Self::PartialUpdate { source, .. } => source.is_auth_expired(),
            _ => false,
        }
    }

    /// Returns `true` if this is a connection or timeout failure.
    ///
    /// Nothing in this crate retries; the flag is for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::PartialUpdate { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. }
            | Self::Status { status, .. }
            | Self::UnexpectedStatus { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::PartialUpdate { source, .. } => source.status(),
            _ => None,
        }
    }
}
