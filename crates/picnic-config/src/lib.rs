//! Shared configuration for the picnic CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `picnic_api::ClientConfig`. The CLI layers its
//! flag-aware overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use picnic_api::{ClientConfig, TlsMode, TransportConfig};

/// Keyring service name; entries are keyed `<profile>/<kind>`.
pub const KEYRING_SERVICE: &str = "picnic";

/// Environment variables consulted by the credential chain.
pub const ENV_USERNAME: &str = "PICNIC_USERNAME";
pub const ENV_PASSWORD: &str = "PICNIC_PASSWORD";
pub const ENV_AUTH_TOKEN: &str = "PICNIC_AUTH_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    /// Named account profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when no flag picks one.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            country_code: default_country_code(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_country_code() -> String {
    picnic_api::storefront::DEFAULT_COUNTRY_CODE.into()
}

/// A named account profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Market code (`NL`, `DE`, ...). Falls back to `defaults.country_code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Replaces the storefront URL derived from country and version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Host the barcode redirect chain starts from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_url: Option<String>,

    /// Account e-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password (plaintext; prefer keyring).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Session token (plaintext; prefer keyring).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Environment variable name containing the session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "picnic", "picnic").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("picnic");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path, with `PICNIC_` env overrides.
///
/// Nested keys use a double underscore:
/// `PICNIC_PROFILES__HOME__COUNTRY_CODE=DE`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PICNIC_").split("__"));

    Ok(figment.extract()?)
}

/// Parse config from a TOML string (defaults applied, no env overrides).
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::string(toml));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Secret storage ──────────────────────────────────────────────────

/// Where secrets live between runs.
pub trait SecretStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
    fn delete(&self, key: &str) -> Result<(), ConfigError>;
}

/// The operating system keyring, under [`KEYRING_SERVICE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Keyring;

impl SecretStore for Keyring {
    fn get(&self, key: &str) -> Option<String> {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .and_then(|entry| entry.get_password())
            .ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        keyring::Entry::new(KEYRING_SERVICE, key)?.set_password(value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), ConfigError> {
        match keyring::Entry::new(KEYRING_SERVICE, key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for callers that must not touch the system keyring.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("secret store lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.entries
            .lock()
            .expect("secret store lock poisoned")
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), ConfigError> {
        self.entries
            .lock()
            .expect("secret store lock poisoned")
            .remove(key);
        Ok(())
    }
}

fn password_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

fn token_key(profile_name: &str) -> String {
    format!("{profile_name}/auth-token")
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Credential lookup: environment first, then the secret store, then
/// plaintext in the profile.
pub struct Credentials<S, E> {
    store: S,
    env: E,
}

impl Credentials<Keyring, fn(&str) -> Option<String>> {
    /// Process environment plus the system keyring.
    pub fn system() -> Self {
        Self {
            store: Keyring,
            env: process_env,
        }
    }
}

impl<S, E> Credentials<S, E>
where
    S: SecretStore,
    E: Fn(&str) -> Option<String>,
{
    pub fn new(store: S, env: E) -> Self {
        Self { store, env }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Account name: profile, then `PICNIC_USERNAME`.
    pub fn username(&self, profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
        profile
            .username
            .clone()
            .or_else(|| (self.env)(ENV_USERNAME))
            .ok_or_else(|| ConfigError::NoCredentials {
                profile: profile_name.into(),
            })
    }

    /// Password: `PICNIC_PASSWORD`, then keyring, then plaintext.
    pub fn password(
        &self,
        profile: &Profile,
        profile_name: &str,
    ) -> Result<SecretString, ConfigError> {
        // 1. Env var
        if let Some(pw) = (self.env)(ENV_PASSWORD) {
            return Ok(SecretString::from(pw));
        }

        // 2. Keyring
        if let Some(pw) = self.store.get(&password_key(profile_name)) {
            return Ok(SecretString::from(pw));
        }

        // 3. Plaintext in config
        if let Some(ref pw) = profile.password {
            return Ok(SecretString::from(pw.clone()));
        }

        Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
    }

    /// Session token from an earlier login, if any.
    ///
    /// Order: the profile's `auth_token_env`, `PICNIC_AUTH_TOKEN`, keyring,
    /// plaintext.
    pub fn auth_token(&self, profile: &Profile, profile_name: &str) -> Option<SecretString> {
        profile
            .auth_token_env
            .as_deref()
            .and_then(|name| (self.env)(name))
            .or_else(|| (self.env)(ENV_AUTH_TOKEN))
            .or_else(|| self.store.get(&token_key(profile_name)))
            .or_else(|| profile.auth_token.clone())
            .map(SecretString::from)
    }

    pub fn store_password(&self, profile_name: &str, password: &str) -> Result<(), ConfigError> {
        self.store.set(&password_key(profile_name), password)
    }

    pub fn store_auth_token(&self, profile_name: &str, token: &str) -> Result<(), ConfigError> {
        debug!(profile = profile_name, "storing auth token");
        self.store.set(&token_key(profile_name), token)
    }

    pub fn clear_auth_token(&self, profile_name: &str) -> Result<(), ConfigError> {
        self.store.delete(&token_key(profile_name))
    }
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate a two-letter market code and return it uppercased.
pub fn normalize_country_code(code: &str) -> Result<String, ConfigError> {
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ConfigError::Validation {
            field: "country_code".into(),
            reason: format!("expected a two-letter code, got '{code}'"),
        })
    }
}

/// Build a `ClientConfig` from a profile; no CLI flag overrides.
///
/// The session token is filled in from the credential chain when one is
/// available. Username and password are not needed here; they are only
/// resolved when a login is required.
pub fn profile_to_client_config<S, E>(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    credentials: &Credentials<S, E>,
) -> Result<ClientConfig, ConfigError>
where
    S: SecretStore,
    E: Fn(&str) -> Option<String>,
{
    let country_code = normalize_country_code(
        profile
            .country_code
            .as_deref()
            .unwrap_or(&defaults.country_code),
    )?;

    let tls = match profile.ca_cert {
        Some(ref ca_path) => TlsMode::CustomCa(ca_path.clone()),
        None => TlsMode::System,
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let defaults_client = ClientConfig::default();

    Ok(ClientConfig {
        country_code,
        api_version: profile
            .api_version
            .clone()
            .unwrap_or(defaults_client.api_version),
        base_url: profile.base_url.clone(),
        barcode_url: profile
            .barcode_url
            .clone()
            .unwrap_or(defaults_client.barcode_url),
        identity: defaults_client.identity,
        transport: TransportConfig { tls, timeout },
        auth_token: credentials.auth_token(profile, profile_name),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn memory() -> Credentials<MemoryStore, fn(&str) -> Option<String>> {
        let env: fn(&str) -> Option<String> = no_env;
        Credentials::new(MemoryStore::default(), env)
    }

    #[test]
    fn parses_profiles_over_defaults() {
        let cfg = parse_config(
            r#"
            default_profile = "home"

            [defaults]
            output = "json"

            [profiles.home]
            country_code = "de"
            username = "me@example.com"
            timeout = 5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.default_profile_name(), "home");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.defaults.country_code, "NL");

        let home = &cfg.profiles["home"];
        assert_eq!(home.country_code.as_deref(), Some("de"));
        assert_eq!(home.username.as_deref(), Some("me@example.com"));
        assert_eq!(home.timeout, Some(5));
    }

    #[test]
    fn empty_config_gets_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.default_profile_name(), "default");
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn config_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                country_code: Some("NL".into()),
                username: Some("me@example.com".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[profiles.default]"));
        assert!(!text.contains("password"));

        let loaded = parse_config(&text).unwrap();
        assert_eq!(
            loaded.profiles["default"].username.as_deref(),
            Some("me@example.com")
        );
    }

    #[test]
    fn password_chain_prefers_env_then_store_then_plaintext() {
        let profile = Profile {
            password: Some("plain".into()),
            ..Profile::default()
        };

        let creds = memory();
        assert_eq!(creds.password(&profile, "p").unwrap().expose_secret(), "plain");

        creds.store_password("p", "stored").unwrap();
        assert_eq!(creds.password(&profile, "p").unwrap().expose_secret(), "stored");

        let with_env = Credentials::new(MemoryStore::default(), |name: &str| {
            (name == ENV_PASSWORD).then(|| "from-env".to_owned())
        });
        assert_eq!(with_env.password(&profile, "p").unwrap().expose_secret(), "from-env");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let creds = memory();
        let err = creds.password(&Profile::default(), "p").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "p"));
        assert!(creds.username(&Profile::default(), "p").is_err());
    }

    #[test]
    fn auth_token_lifecycle_in_store() {
        let creds = memory();
        let profile = Profile::default();
        assert!(creds.auth_token(&profile, "p").is_none());

        creds.store_auth_token("p", "tok").unwrap();
        assert_eq!(creds.auth_token(&profile, "p").unwrap().expose_secret(), "tok");

        creds.clear_auth_token("p").unwrap();
        assert!(creds.auth_token(&profile, "p").is_none());
    }

    #[test]
    fn profile_token_env_wins() {
        let profile = Profile {
            auth_token: Some("plain".into()),
            auth_token_env: Some("MY_PICNIC_TOKEN".into()),
            ..Profile::default()
        };
        let creds = Credentials::new(MemoryStore::default(), |name: &str| {
            (name == "MY_PICNIC_TOKEN").then(|| "env-token".to_owned())
        });
        assert_eq!(creds.auth_token(&profile, "p").unwrap().expose_secret(), "env-token");
    }

    #[test]
    fn translates_profile_to_client_config() {
        let profile = Profile {
            country_code: Some("de".into()),
            api_version: Some("17".into()),
            auth_token: Some("tok".into()),
            ca_cert: Some(PathBuf::from("/etc/picnic/ca.pem")),
            timeout: Some(12),
            ..Profile::default()
        };

        let client = profile_to_client_config(&profile, "p", &Defaults::default(), &memory()).unwrap();

        assert_eq!(client.country_code, "DE");
        assert_eq!(client.api_version, "17");
        assert_eq!(client.transport.timeout, Duration::from_secs(12));
        assert!(matches!(client.transport.tls, TlsMode::CustomCa(_)));
        assert_eq!(client.auth_token.as_ref().unwrap().expose_secret(), "tok");
        assert_eq!(
            client.storefront_url().unwrap().as_str(),
            "https://storefront-prod.de.picnicinternational.com/api/17"
        );
    }

    #[test]
    fn rejects_malformed_country_code() {
        let profile = Profile {
            country_code: Some("NLD".into()),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, "p", &Defaults::default(), &memory())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "country_code"));
    }
}
