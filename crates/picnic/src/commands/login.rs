//! Login command handler.
//!
//! Always performs a fresh login, ignoring any stored token, and keeps the
//! new token in the keyring for later commands.

use picnic_api::StorefrontClient;
use picnic_config::{ConfigError, Credentials};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let credentials = Credentials::system();
    let cfg = config::load(global)?;
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = config::active_profile(global, &cfg, &profile_name)?;

    let username = match args.username {
        Some(username) => username,
        None => credentials.username(&profile, &profile_name)?,
    };
    let password = match credentials.password(&profile, &profile_name) {
        Ok(password) => password,
        Err(ConfigError::NoCredentials { .. }) => prompt_password()?,
        Err(e) => return Err(e.into()),
    };

    let mut client_config =
        config::resolve_client_config(&profile, &profile_name, &cfg, global, &credentials)?;
    client_config.auth_token = None;
    let client = StorefrontClient::new(client_config)?;

    let response = client
        .login(&username, &password)
        .await
        .map_err(|e| CliError::from(e).for_profile(&profile_name))?;

    let token = client.session().auth_token();
    if !args.no_store {
        if let Some(ref token) = token {
            credentials.store_auth_token(&profile_name, token.expose_secret())?;
        }
    }

    if !global.quiet {
        eprintln!("✓ Logged in as {username} (profile '{profile_name}')");
        if token.is_none() {
            eprintln!("  The storefront returned no session token.");
        }
    }

    if !matches!(global.output, crate::cli::OutputFormat::Table) {
        output::print_output(&output::render_value(&global.output, &response), global.quiet);
    }
    Ok(())
}

fn prompt_password() -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}
