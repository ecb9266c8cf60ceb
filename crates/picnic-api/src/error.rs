use thiserror::Error;

/// Top-level error type for the `picnic-api` crate.
///
/// "Not found" is deliberately absent: extractors and lookups report missing
/// data as `None` or empty collections. Only authentication failures,
/// transport problems, and undecodable responses surface here.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The storefront answered with `AUTH_ERROR` or `AUTH_INVALID_CRED`.
    #[error("Picnic authentication error: {message}")]
    Authentication {
        code: Option<String>,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not JSON, or its top level was neither object nor array.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Non-success HTTP status whose body could not be decoded.
    #[error("Storefront API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Returns `true` if the storefront rejected the session or credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The storefront error code, if the server supplied one.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Authentication { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
