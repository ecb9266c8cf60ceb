//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use picnic_config::{Credentials, Defaults};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

const MASK: &str = "****";

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "country_code = \"{}\"", cfg.defaults.country_code);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref cc) = p.country_code {
            let _ = writeln!(out, "country_code = \"{cc}\"");
        }
        if let Some(ref v) = p.api_version {
            let _ = writeln!(out, "api_version = \"{v}\"");
        }
        if let Some(ref url) = p.base_url {
            let _ = writeln!(out, "base_url = \"{url}\"");
        }
        if let Some(ref url) = p.barcode_url {
            let _ = writeln!(out, "barcode_url = \"{url}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"{MASK}\"");
        }
        if p.auth_token.is_some() {
            let _ = writeln!(out, "auth_token = \"{MASK}\"");
        }
        if let Some(ref env) = p.auth_token_env {
            let _ = writeln!(out, "auth_token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Copy of the config with secrets masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
            country_code: cfg.defaults.country_code.clone(),
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let profile = Profile {
                    password: p.password.as_ref().map(|_| MASK.to_owned()),
                    auth_token: p.auth_token.as_ref().map(|_| MASK.to_owned()),
                    ..p.clone()
                };
                (name.clone(), profile)
            })
            .collect(),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a secret, rejecting empty input.
fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: label.to_lowercase(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Name of the profile a secret is stored for; it must exist.
fn existing_profile_name(global: &GlobalOpts, cfg: &Config) -> Result<String, CliError> {
    let name = config::active_profile_name(global, cfg);
    if cfg.profiles.contains_key(&name) {
        Ok(name)
    } else {
        Err(CliError::ProfileNotFound {
            name,
            available: config::available_profiles(cfg),
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path(global);
            eprintln!("🧺 picnic: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Market
            let country: String = Input::new()
                .with_prompt("Country code (NL, DE, BE, FR)")
                .default(picnic_api::storefront::DEFAULT_COUNTRY_CODE.into())
                .interact_text()
                .map_err(prompt_err)?;
            let country_code = picnic_config::normalize_country_code(&country)?;

            // 3. Account
            let username: String = Input::new()
                .with_prompt("E-mail address")
                .interact_text()
                .map_err(prompt_err)?;
            let password = prompt_secret("Password")?;

            // 4. Where the password lives
            let choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if selection == 0 {
                Credentials::system().store_password(&profile_name, &password)?;
                eprintln!("   ✓ Password stored in system keyring");
                None
            } else {
                Some(password)
            };

            // 5. Merge into the existing config
            let mut cfg = config::load(global)?;
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    country_code: Some(country_code),
                    username: Some(username),
                    password: password_field,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save(&cfg, global)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: picnic login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load(global)?);
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let default = cfg.default_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: picnic config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save(&cfg, global)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Secrets ─────────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let profile_name = existing_profile_name(global, &cfg)?;
            let password = prompt_secret("Password")?;
            Credentials::system().store_password(&profile_name, &password)?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load(global)?;
            let profile_name = existing_profile_name(global, &cfg)?;
            let token = prompt_secret("Auth token")?;
            Credentials::system().store_auth_token(&profile_name, &token)?;
            eprintln!("✓ Auth token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Config {
        picnic_config::parse_config(
            r#"
            default_profile = "home"

            [profiles.home]
            country_code = "DE"
            username = "me@example.com"
            password = "hunter2"
            auth_token = "tok"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn secrets_are_masked_in_text_view() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[profiles.home]"));
        assert!(text.contains("username = \"me@example.com\""));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("\"tok\""));
    }

    #[test]
    fn secrets_are_masked_in_structured_view() {
        let cfg = redacted(&sample());
        let home = &cfg.profiles["home"];
        assert_eq!(home.password.as_deref(), Some(MASK));
        assert_eq!(home.auth_token.as_deref(), Some(MASK));
        assert_eq!(home.country_code.as_deref(), Some("DE"));
    }
}
