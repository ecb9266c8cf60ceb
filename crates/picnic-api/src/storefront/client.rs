// Storefront HTTP client
//
// Wraps two `reqwest::Client`s (redirect-following for API traffic, and
// redirect-free for barcode walks) with storefront URL construction, session
// header injection, and response classification. Endpoint modules call
// `get`/`post` and only ever see decoded trees that are not auth failures.

use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{self, IdentityHeaders, Session};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Storefront base URL template: country code (lowercase), then API version.
pub const DEFAULT_URL: &str = "https://storefront-prod.{country}.picnicinternational.com/api/{version}";
/// Gateway host, usable as a POST base override.
pub const GLOBAL_GATEWAY_URL: &str = "https://gateway-prod.global.picnicinternational.com";
/// Host serving the barcode redirect chain.
pub const BARCODE_URL: &str = "https://picnic.app";
pub const DEFAULT_COUNTRY_CODE: &str = "NL";
pub const DEFAULT_API_VERSION: &str = "15";

/// Everything needed to build a [`StorefrontClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Two-letter market code, e.g. `NL`, `DE`.
    pub country_code: String,
    pub api_version: String,
    /// Replaces the templated storefront URL entirely when set.
    pub base_url: Option<String>,
    /// Host the barcode walk starts from.
    pub barcode_url: String,
    pub identity: IdentityHeaders,
    pub transport: TransportConfig,
    /// Token from an earlier login; the client starts authenticated.
    pub auth_token: Option<SecretString>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.into(),
            api_version: DEFAULT_API_VERSION.into(),
            base_url: None,
            barcode_url: BARCODE_URL.into(),
            identity: IdentityHeaders::default(),
            transport: TransportConfig::default(),
            auth_token: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration for one market.
    pub fn for_country(country_code: &str) -> Self {
        Self {
            country_code: country_code.to_owned(),
            ..Self::default()
        }
    }

    /// The storefront base URL this configuration resolves to.
    ///
    /// `NL` + `15` gives `https://storefront-prod.nl.picnicinternational.com/api/15`.
    pub fn storefront_url(&self) -> Result<Url, Error> {
        let url = match &self.base_url {
            Some(url) => url.clone(),
            None => DEFAULT_URL
                .replace("{country}", &self.country_code.to_lowercase())
                .replace("{version}", &self.api_version),
        };
        Ok(Url::parse(&url)?)
    }
}

/// Client for the Picnic storefront.
///
/// One instance holds one session. Cloning is not supported; share it
/// behind an `Arc` if several tasks need the same session.
pub struct StorefrontClient {
    http: reqwest::Client,
    no_redirect_http: reqwest::Client,
    base_url: Url,
    barcode_url: Url,
    country_code: String,
    identity: IdentityHeaders,
    session: Session,
}

impl StorefrontClient {
    /// Build a client from configuration. No network traffic happens here.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let base_url = config.storefront_url()?;
        let barcode_url = Url::parse(&config.barcode_url)?;
        let http = config.transport.build_client()?;
        let no_redirect_http = config.transport.build_no_redirect_client()?;

        debug!(%base_url, country = %config.country_code, "storefront client configured");

        Ok(Self {
            http,
            no_redirect_http,
            base_url,
            barcode_url,
            country_code: config.country_code,
            identity: config.identity,
            session: Session::new(config.auth_token),
        })
    }

    /// The resolved storefront base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// The session state (token holder).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `true` once a token is held and has not been rejected.
    pub fn logged_in(&self) -> bool {
        self.session.authenticated()
    }

    pub(crate) fn identity(&self) -> &IdentityHeaders {
        &self.identity
    }

    pub(crate) fn barcode_url(&self) -> &Url {
        &self.barcode_url
    }

    pub(crate) fn no_redirect_http(&self) -> &reqwest::Client {
        &self.no_redirect_http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}{path}`. Paths start with `/` and may carry a query string.
    fn url(base: &str, path: &str) -> Result<Url, Error> {
        let base = base.trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the response tree.
    ///
    /// Page-render endpoints need the device identity headers; pass
    /// `with_identity` for those.
    pub async fn get(&self, path: &str, with_identity: bool) -> Result<Value, Error> {
        let url = Self::url(self.base_url.as_str(), path)?;
        debug!("GET {}", url);

        let identity = with_identity.then_some(&self.identity);
        let resp = self
            .http
            .get(url)
            .headers(self.session.headers(identity))
            .send()
            .await
            .map_err(Error::Transport)?;

        self.decode(resp).await
    }

    /// Send a POST request and decode the response tree.
    ///
    /// `body` of `None` sends no body. `base_override` replaces the
    /// storefront base for this request only (e.g. [`GLOBAL_GATEWAY_URL`]).
    pub async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        base_override: Option<&str>,
    ) -> Result<Value, Error> {
        let base = base_override.unwrap_or(self.base_url.as_str());
        let url = Self::url(base, path)?;
        debug!("POST {}", url);

        let mut builder = self.http.post(url).headers(self.session.headers(None));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.decode(resp).await
    }

    /// Capture any token, decode the body, and classify auth failures.
    ///
    /// A classified auth failure drops the session token before the error is
    /// returned. Every other JSON object or array is returned unchanged, even
    /// under a non-success status.
    async fn decode(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        self.session.capture_token(resp.headers());

        let body = resp.text().await.map_err(Error::Transport)?;

        let tree: Value = match serde_json::from_str(&body) {
            Ok(tree) => tree,
            Err(_) if !status.is_success() => {
                return Err(Error::Api {
                    status: status.as_u16(),
                    message: preview(&body),
                });
            }
            Err(e) => {
                return Err(Error::Deserialization {
                    message: format!("{e} (body preview: {:?})", preview(&body)),
                    body,
                });
            }
        };

        if let Some(failure) = auth::classify_auth_failure(&tree) {
            warn!(code = %failure.code, "storefront rejected the session");
            self.session.invalidate();
            return Err(Error::Authentication {
                message: failure
                    .message
                    .unwrap_or_else(|| format!("storefront returned {}", failure.code)),
                code: Some(failure.code),
            });
        }

        if !(tree.is_object() || tree.is_array()) {
            return Err(Error::Deserialization {
                message: "expected a JSON object or array at the top level".into(),
                body,
            });
        }

        if !status.is_success() {
            warn!(%status, "storefront returned an error status with a JSON body");
        }

        Ok(tree)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
