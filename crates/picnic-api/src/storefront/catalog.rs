// Store catalog endpoint

use tracing::debug;

use crate::error::Error;
use crate::extract;
use crate::models::Category;
use crate::storefront::client::StorefrontClient;

impl StorefrontClient {
    /// Store catalog, expanded `depth` levels below the top.
    ///
    /// `GET /my_store?depth={depth}`
    pub async fn get_categories(&self, depth: u32) -> Result<Vec<Category>, Error> {
        debug!(depth, "fetching catalog");
        let tree = self.get(&format!("/my_store?depth={depth}"), false).await?;
        Ok(extract::extract_catalog(&tree))
    }

    /// Catalog rendered as an indented tree listing.
    pub async fn category_tree(&self, depth: u32) -> Result<Vec<String>, Error> {
        let categories = self.get_categories(depth).await?;
        Ok(extract::render_tree(&categories))
    }
}
