// Storefront login and account endpoints

use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth;
use crate::error::Error;
use crate::storefront::client::{ClientConfig, StorefrontClient};

impl StorefrontClient {
    /// Build a client and log in unless the configuration already carries a
    /// token.
    pub async fn connect(
        config: ClientConfig,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, Error> {
        let client = Self::new(config)?;
        if !client.logged_in() {
            client.login(username, password).await?;
        }
        Ok(client)
    }

    /// Log in with username and password.
    ///
    /// `POST /user/login` with `{key, secret, client_id}`, where `secret` is
    /// the MD5 hex digest of the password. The token arrives in the
    /// `x-picnic-auth` response header and is stored in the session.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Value, Error> {
        debug!(username, "logging in");
        let body = auth::login_payload(username, password);
        let response = self.post("/user/login", Some(&body), None).await?;

        if self.logged_in() {
            debug!("login successful");
        } else {
            warn!("login response carried no auth token");
        }
        Ok(response)
    }

    /// Current user profile.
    ///
    /// `GET /user`
    pub async fn get_user(&self) -> Result<Value, Error> {
        debug!("fetching user");
        self.get("/user", false).await
    }
}
