//! CLI configuration: thin wrapper around `f5os_config` that layers
//! `GlobalOpts` overrides on top of the selected profile.

use secrecy::SecretString;

use f5os_api::SessionConfig;
use f5os_config::{Config, ConfigError, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Profile selected by `--profile`, then `default_profile`, then `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `SessionConfig` from the config file, profile, and CLI overrides.
///
/// A missing profile is only an error when it was asked for by name;
/// otherwise the flags alone must describe the device.
pub fn build_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = f5os_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(ConfigError::UnknownProfile {
                profile: profile_name,
            }
            .into());
        }
        None => Profile::default(),
    };

    let merged = apply_overrides(profile, global);
    let mut session =
        f5os_config::profile_to_session_config(&merged, &profile_name, &cfg.defaults)?;

    // An explicit flag beats the profile's password_env.
    if let Some(ref password) = global.password {
        session.password = SecretString::from(password.clone());
    }

    Ok(session)
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if global.port.is_some() {
        profile.port = global.port;
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.password.is_some() {
        profile.password.clone_from(&global.password);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    profile
}
