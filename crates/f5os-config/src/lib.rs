//! Shared configuration for F5OS tools.
//!
//! TOML profiles, credential resolution (env + plaintext), log-level
//! selection from the Terraform-style environment, and translation to
//! `f5os_api::SessionConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use f5os_api::{SessionConfig, TransportConfig};

/// Generic log verbosity variable.
pub const LOG_ENV: &str = "TF_LOG";
/// Component-specific override of [`LOG_ENV`].
pub const PROVIDER_LOG_ENV: &str = "TF_LOG_PROVIDER_F5OS";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub teem: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            teem: false,
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// A named F5OS device profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Host, address or URL of the management interface.
    pub host: String,

    /// Port used when `host` carries none.
    pub port: Option<u16>,

    pub username: Option<String>,

    /// Password in plaintext. Prefer `password_env`.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Caller tag sent as `User-Agent`.
    pub user_agent: Option<String>,

    /// Override telemetry opt-in.
    pub teem: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "f5", "f5os").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("f5os");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, then apply `F5OS_*` environment overrides.
///
/// Nested keys use a double underscore: `F5OS_DEFAULTS__TIMEOUT=30`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("F5OS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the login password for a profile.
///
/// Order: the profile's `password_env`, then `F5OS_PASSWORD`, then the
/// plaintext value.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(pw) = std::env::var("F5OS_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the login username for a profile.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("F5OS_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Build a `SessionConfig` from a profile and global defaults.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SessionConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("profile '{profile_name}' has no host"),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    Ok(SessionConfig {
        host: profile.host.clone(),
        username,
        password,
        port: profile.port,
        transport: TransportConfig::default(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        user_agent: profile.user_agent.clone(),
        teem: profile.teem.unwrap_or(defaults.teem),
    })
}

// ── Logging ─────────────────────────────────────────────────────────

/// Log level from [`PROVIDER_LOG_ENV`] or [`LOG_ENV`], `INFO` when neither
/// is set.
pub fn log_level_from_env() -> LevelFilter {
    resolve_log_level(|name| std::env::var(name).ok())
}

/// Pick the log level using `lookup` to read variables.
///
/// The component variable overrides the generic one. Empty values count as
/// unset; unrecognized values fall back to `INFO`.
pub fn resolve_log_level(lookup: impl Fn(&str) -> Option<String>) -> LevelFilter {
    let raw = [PROVIDER_LOG_ENV, LOG_ENV]
        .into_iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()));

    match raw.as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("trace") => LevelFilter::TRACE,
        Some(v) if v.eq_ignore_ascii_case("debug") => LevelFilter::DEBUG,
        Some(v) if v.eq_ignore_ascii_case("warn") => LevelFilter::WARN,
        Some(v) if v.eq_ignore_ascii_case("error") => LevelFilter::ERROR,
        Some(v) if v.eq_ignore_ascii_case("off") => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}
