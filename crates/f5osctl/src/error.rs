//! CLI error types with miette diagnostics.
//!
//! Maps `f5os_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use f5os_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {host}")]
    #[diagnostic(
        code(f5os::connection_failed),
        help(
            "Check that the management interface is reachable.\n\
             Try: f5osctl platform --host {host} -v"
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<f5os_api::Error>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(f5os::timeout),
        help("Increase timeout with --timeout or check device responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed for {host}: {message}")]
    #[diagnostic(
        code(f5os::auth_failed),
        help("Verify the username and password, or set F5OS_PASSWORD.")
    )]
    AuthFailed { host: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(f5os::no_credentials),
        help("Pass --username and --password, or set F5OS_USERNAME and F5OS_PASSWORD.")
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(f5os::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(f5os::api_error))]
    Api { status: u16, message: String },

    #[error("Interface update stopped after {completed} step(s): {message}")]
    #[diagnostic(
        code(f5os::partial_update),
        help("Some VLANs were already removed. Re-read the interface before retrying.")
    )]
    PartialUpdate { completed: usize, message: String },

    #[error(transparent)]
    #[diagnostic(code(f5os::request))]
    Request(Box<f5os_api::Error>),

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(f5os::validation),
        help("Pass --host or configure a profile in the config file.")
    )]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(code(f5os::profile_not_found))]
    ProfileNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(f5os::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error("Could not read {path}")]
    #[diagnostic(code(f5os::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(f5os::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a client error, using `host` and `timeout_secs` for context.
    pub fn from_api(err: f5os_api::Error, host: &str, timeout_secs: u64) -> Self {
        match err {
            f5os_api::Error::Authentication { message } => Self::AuthFailed {
                host: host.into(),
                message,
            },
            f5os_api::Error::PartialUpdate { completed, source } => Self::PartialUpdate {
                completed: completed.len(),
                message: source.to_string(),
            },
            ref e if e.is_auth_expired() => Self::AuthFailed {
                host: host.into(),
                message: e.to_string(),
            },
            f5os_api::Error::Transport(ref e) if e.is_timeout() => Self::Timeout {
                seconds: timeout_secs,
            },
            e @ (f5os_api::Error::Transport(_) | f5os_api::Error::Tls(_)) => {
                Self::ConnectionFailed {
                    host: host.into(),
                    source: Box::new(e),
                }
            }
            f5os_api::Error::Api {
                status, message, ..
            } => Self::Api { status, message },
            f5os_api::Error::Status { status, body } => Self::Api {
                status,
                message: body,
            },
            other => Self::Request(Box::new(other)),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound { name: profile },
            ConfigError::Figment(err) => Self::Config(err),
        }
    }
}
