// Barcode resolution
//
// The storefront has no barcode endpoint. Instead the public app host
// redirects `/<cc>/qr/gtin/<code>` through a short chain that ends either at
// a product deep link carrying `;id=<article>` or at the generic storefront
// page for unknown codes. The chain is walked one hop at a time with
// automatic redirects disabled.

use reqwest::header::LOCATION;
use tracing::debug;

use crate::error::Error;
use crate::models::Article;
use crate::storefront::articles::encode;
use crate::storefront::client::StorefrontClient;

/// Hop limit used when the caller has no preference.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Where the chain ends for a code the storefront does not know.
pub const UNKNOWN_CODE_URL: &str = "http://picnic.app/nl/link/store/storefront";

const ARTICLE_MARKER: &str = ";id=";

/// Article id carried by a product deep link.
fn article_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(ARTICLE_MARKER)?;
    let id = rest.split(['?', '#', ';', '&']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

impl StorefrontClient {
    /// Resolve a GTIN/EAN barcode to an article.
    ///
    /// Follows at most `max_redirects` hops. Returns `Ok(None)` for the
    /// unknown-code page, a hop without a usable `Location`, or an
    /// exhausted hop budget.
    pub async fn get_article_by_gtin(
        &self,
        gtin: &str,
        max_redirects: u32,
    ) -> Result<Option<Article>, Error> {
        let base = self.barcode_url().as_str().trim_end_matches('/');
        let mut url = format!(
            "{base}/{}/qr/gtin/{}",
            self.country_code().to_lowercase(),
            encode(gtin)
        );

        for hop in 0..max_redirects {
            if url == UNKNOWN_CODE_URL {
                debug!(gtin, "barcode unknown to the storefront");
                return Ok(None);
            }
            if let Some(id) = article_id(&url) {
                debug!(gtin, article_id = id, "barcode resolved");
                return self.get_article(id).await;
            }

            debug!(hop, %url, "following barcode redirect");
            let resp = self
                .no_redirect_http()
                .get(&url)
                .headers(self.session().headers(Some(self.identity())))
                .send()
                .await
                .map_err(Error::Transport)?;

            let Some(location) = resp.headers().get(LOCATION).and_then(|v| v.to_str().ok())
            else {
                debug!(gtin, status = %resp.status(), "barcode chain ended without a redirect");
                return Ok(None);
            };

            match resp.url().join(location) {
                Ok(next) => url = next.to_string(),
                Err(e) => {
                    debug!(gtin, location, error = %e, "barcode redirect target is not a URL");
                    return Ok(None);
                }
            }
        }

        debug!(gtin, max_redirects, "barcode redirect budget exhausted");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_id_is_taken_from_deep_link() {
        assert_eq!(article_id("https://picnic.app/nl/p/melk;id=s1001"), Some("s1001"));
        assert_eq!(article_id("https://picnic.app/nl/p;id=42?utm=qr"), Some("42"));
        assert_eq!(article_id("https://picnic.app/nl/p/melk"), None);
        assert_eq!(article_id("https://picnic.app/nl/p;id="), None);
    }
}
