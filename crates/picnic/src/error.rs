//! CLI error types with miette diagnostics.
//!
//! Maps storefront and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use picnic_config::ConfigError;

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
    #[error("Could not reach the storefront at {url}")]
    #[diagnostic(
        code(picnic::connection_failed),
        help(
            "Check your network connection and the profile's country code.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(picnic::tls_error),
        help("Check the ca_cert path configured in your profile.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(picnic::timeout),
        help("Increase the timeout with --timeout or the profile's timeout setting.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(picnic::auth_failed),
        help(
            "The session token was rejected or the credentials are wrong.\n\
             Run: picnic login --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(picnic::no_credentials),
        help(
            "Log in with: picnic login\n\
             Or configure a profile with: picnic config init\n\
             Or set PICNIC_USERNAME and PICNIC_PASSWORD (or PICNIC_AUTH_TOKEN)."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(picnic::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Storefront error ({code}): {message}")]
    #[diagnostic(code(picnic::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(picnic::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(picnic::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: picnic config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(picnic::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(picnic::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to authentication failures.
    pub fn for_profile(self, profile_name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile_name.into(),
                message,
            },
            other => other,
        }
    }
}

// ── picnic_api::Error → CliError ─────────────────────────────────────

impl From<picnic_api::Error> for CliError {
    fn from(err: picnic_api::Error) -> Self {
        match err {
            picnic_api::Error::Authentication { code, message } => CliError::AuthFailed {
                profile: "default".into(),
                message: match code {
                    Some(code) => format!("{message} ({code})"),
                    None => message,
                },
            },

            picnic_api::Error::Transport(e) if e.is_timeout() => CliError::Timeout,

            picnic_api::Error::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },

            picnic_api::Error::InvalidUrl(e) => CliError::Validation {
                field: "base_url".into(),
                reason: e.to_string(),
            },

            picnic_api::Error::Tls(message) => CliError::TlsError { message },

            picnic_api::Error::Deserialization { message, .. } => CliError::ApiError {
                code: "unexpected_response".into(),
                message,
            },

            picnic_api::Error::Api { status, message } => CliError::ApiError {
                code: format!("HTTP {status}"),
                message,
            },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            other => CliError::Config(other),
        }
    }
}
