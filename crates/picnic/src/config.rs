//! CLI configuration: thin wrapper around `picnic_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--config, --country, --timeout).

use std::path::PathBuf;
use std::time::Duration;

use picnic_api::ClientConfig;
use picnic_config::{Credentials, SecretStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use picnic_config::{Config, Profile};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `PICNIC_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(picnic_config::config_path)
}

/// Load the config file in effect; a missing file yields the defaults.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(picnic_config::load_config_from(&config_path(global))?)
}

/// Write the config back to the file in effect.
pub fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    Ok(picnic_config::save_config_to(cfg, &config_path(global))?)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// The active profile, or an empty one when the config does not define it.
///
/// An explicitly requested `--profile` must exist.
pub fn active_profile(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    match config.profiles.get(profile_name) {
        Some(profile) => Ok(profile.clone()),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            name: profile_name.into(),
            available: available_profiles(config),
        }),
        None => Ok(Profile::default()),
    }
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_client_config<S, E>(
    profile: &Profile,
    profile_name: &str,
    config: &Config,
    global: &GlobalOpts,
    credentials: &Credentials<S, E>,
) -> Result<ClientConfig, CliError>
where
    S: SecretStore,
    E: Fn(&str) -> Option<String>,
{
    let mut client_config = picnic_config::profile_to_client_config(
        profile,
        profile_name,
        &config.defaults,
        credentials,
    )?;

    // 1. Country (flag > env > profile > defaults)
    if let Some(ref country) = global.country {
        client_config.country_code = picnic_config::normalize_country_code(country)?;
    }

    // 2. Timeout
    if let Some(secs) = global.timeout {
        client_config.transport.timeout = Duration::from_secs(secs);
    }

    Ok(client_config)
}
