// Session state and authentication helpers
//
// The storefront hands out its session token in the `x-picnic-auth` response
// header and expects it back on the same header. The session captures it
// from any response, so a login (or any call that rotates the token) updates
// the state without the dispatcher knowing which endpoint issued it.

use std::sync::RwLock;

use md5::{Digest, Md5};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, trace};

/// Header carrying the session token, in both directions.
pub const AUTH_HEADER: &str = "x-picnic-auth";

/// Fixed client identifier the storefront expects on login.
pub const CLIENT_ID: u32 = 30100;

/// Error codes that classify a response as an authentication failure.
pub const AUTH_ERROR_CODES: [&str; 2] = ["AUTH_ERROR", "AUTH_INVALID_CRED"];

const AGENT_HEADER: &str = "x-picnic-agent";
const DEVICE_ID_HEADER: &str = "x-picnic-did";

/// Device/agent identity headers required by page-render endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub agent: String,
    pub device_id: String,
}

impl Default for IdentityHeaders {
    fn default() -> Self {
        Self {
            agent: "30100;1.15.272-15295;".into(),
            device_id: "3C417201548B2E3B".into(),
        }
    }
}

/// Authentication state owned by one client instance.
///
/// The token sits behind a single lock; every read-then-use sequence in the
/// dispatcher goes through [`Session::headers`], which takes the lock once.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<SecretString>>,
}

impl Session {
    /// Create a session, optionally seeded with a token from a previous login.
    pub fn new(token: Option<SecretString>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    /// `true` iff a token is held and the server has not rejected it.
    pub fn authenticated(&self) -> bool {
        self.token.read().expect("session lock poisoned").is_some()
    }

    /// The current token, if any.
    pub fn auth_token(&self) -> Option<SecretString> {
        self.token.read().expect("session lock poisoned").clone()
    }

    /// Replace the token.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing auth token");
        *self.token.write().expect("session lock poisoned") = Some(token);
    }

    /// Drop the token after the server classified a response as an auth failure.
    pub fn invalidate(&self) {
        let mut guard = self.token.write().expect("session lock poisoned");
        if guard.take().is_some() {
            debug!("auth token invalidated");
        }
    }

    /// Store the token if the response carries one.
    pub fn capture_token(&self, headers: &HeaderMap) {
        let token = headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());

        if let Some(token) = token {
            trace!("auth token received");
            *self.token.write().expect("session lock poisoned") =
                Some(SecretString::from(token.to_owned()));
        }
    }

    /// Headers for one request: identity headers when asked for, plus the
    /// auth header once a token is held.
    pub fn headers(&self, identity: Option<&IdentityHeaders>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(identity) = identity {
            insert_header(&mut headers, AGENT_HEADER, &identity.agent, false);
            insert_header(&mut headers, DEVICE_ID_HEADER, &identity.device_id, false);
        }

        let guard = self.token.read().expect("session lock poisoned");
        if let Some(token) = guard.as_ref() {
            insert_header(&mut headers, AUTH_HEADER, token.expose_secret(), true);
        }

        headers
    }
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str, sensitive: bool) {
    // Values that are not valid header text are skipped rather than sent mangled.
    if let Ok(mut value) = HeaderValue::from_str(value) {
        value.set_sensitive(sensitive);
        headers.insert(HeaderName::from_static(name), value);
    }
}

// ── Login payload ───────────────────────────────────────────────────

/// MD5 hex digest of the password; the storefront never sees it in clear.
pub fn secret_hash(password: &SecretString) -> String {
    hex::encode(Md5::digest(password.expose_secret().as_bytes()))
}

/// Body for `POST /user/login`.
pub fn login_payload(username: &str, password: &SecretString) -> Value {
    json!({
        "key": username,
        "secret": secret_hash(password),
        "client_id": CLIENT_ID,
    })
}

// ── Classification ──────────────────────────────────────────────────

/// An auth failure reported inside an otherwise well-formed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub code: String,
    pub message: Option<String>,
}

/// Classify a decoded response.
///
/// Only a JSON object whose `error.code` is one of [`AUTH_ERROR_CODES`]
/// counts. Arrays, scalars, and objects without `error` never do.
pub fn classify_auth_failure(tree: &Value) -> Option<AuthFailure> {
    let error = tree.as_object()?.get("error")?;
    let code = error.get("code")?.as_str()?;
    if !AUTH_ERROR_CODES.contains(&code) {
        return None;
    }
    Some(AuthFailure {
        code: code.to_owned(),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .map(String::from),
    })
}
