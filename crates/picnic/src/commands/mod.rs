//! Command dispatch: bridges CLI args -> storefront calls -> output formatting.

pub mod articles;
pub mod barcode;
pub mod cart;
pub mod categories;
pub mod config_cmd;
pub mod deliveries;
pub mod login;
pub mod recipes;
pub mod user;
pub mod util;

use picnic_api::StorefrontClient;
use picnic_config::{Credentials, Keyring};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// System credential chain: process env plus the OS keyring.
pub type SystemCredentials = Credentials<Keyring, fn(&str) -> Option<String>>;

/// Dispatch a storefront-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    if let Command::Login(args) = cmd {
        return login::handle(args, global).await;
    }

    let credentials = Credentials::system();
    let cfg = config::load(global)?;
    let profile_name = config::active_profile_name(global, &cfg);
    let client = connect(global, &cfg, &profile_name, &credentials).await?;

    let result = match cmd {
        Command::User => user::handle(&client, global).await,
        Command::Search(args) => articles::search(&client, args, global).await,
        Command::Article(args) => articles::handle(&client, args, global).await,
        Command::Barcode(args) => barcode::handle(&client, args, global).await,
        Command::Recipes(args) => recipes::handle(&client, args, global).await,
        Command::Categories(args) => categories::handle(&client, args, global).await,
        Command::Cart(args) => cart::handle(&client, args, global).await,
        Command::Deliveries(args) => deliveries::handle(&client, args, global).await,
        // Handled before dispatch
        Command::Login(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    };

    // A rejected token is useless on the next run too
    if let Err(CliError::AuthFailed { .. }) = result {
        if let Err(e) = credentials.clear_auth_token(&profile_name) {
            debug!(error = %e, "could not clear stored auth token");
        }
    }
    result.map_err(|e| e.for_profile(&profile_name))
}

/// Build a client for the active profile, logging in when no session token
/// is available.
async fn connect(
    global: &GlobalOpts,
    cfg: &config::Config,
    profile_name: &str,
    credentials: &SystemCredentials,
) -> Result<StorefrontClient, CliError> {
    let profile = config::active_profile(global, cfg, profile_name)?;
    let client_config =
        config::resolve_client_config(&profile, profile_name, cfg, global, credentials)?;
    let client = StorefrontClient::new(client_config)?;

    if client.logged_in() {
        debug!(profile = profile_name, "reusing stored session token");
        return Ok(client);
    }

    let username = credentials.username(&profile, profile_name)?;
    let password = credentials.password(&profile, profile_name)?;
    client
        .login(&username, &password)
        .await
        .map_err(|e| CliError::from(e).for_profile(profile_name))?;
    remember_token(&client, profile_name, credentials);
    Ok(client)
}

/// Keep the session token for later runs. Failure only costs a re-login.
fn remember_token(client: &StorefrontClient, profile_name: &str, credentials: &SystemCredentials) {
    let Some(token) = client.session().auth_token() else {
        return;
    };
    if let Err(e) = credentials.store_auth_token(profile_name, token.expose_secret()) {
        warn!(error = %e, "could not store auth token in the keyring");
    }
}
