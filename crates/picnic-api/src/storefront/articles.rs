// Article and product search endpoints

use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::error::Error;
use crate::extract;
use crate::models::{Article, ArticleDetails, SearchResult};
use crate::storefront::client::StorefrontClient;

pub(crate) fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl StorefrontClient {
    /// Product search.
    ///
    /// `GET /pages/search-page-results?search_term={term}`
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>, Error> {
        debug!(term, "searching products");
        let path = format!("/pages/search-page-results?search_term={}", encode(term));
        let tree = self.get(&path, true).await?;
        Ok(extract::extract_search_results(&tree))
    }

    /// Basic article lookup: id and display name.
    ///
    /// `GET /pages/product-details-page-root?id={id}`
    pub async fn get_article(&self, article_id: &str) -> Result<Option<Article>, Error> {
        debug!(article_id, "fetching article");
        let path = format!("/pages/product-details-page-root?id={}", encode(article_id));
        let tree = self.get(&path, true).await?;
        Ok(extract::extract_article(&tree, article_id))
    }

    /// Full article details from the product page.
    ///
    /// `GET /pages/product-details-page-root?id={id}&show_category_action=true`
    pub async fn get_article_details(
        &self,
        article_id: &str,
    ) -> Result<Option<ArticleDetails>, Error> {
        debug!(article_id, "fetching article details");
        let path = format!(
            "/pages/product-details-page-root?id={}&show_category_action=true",
            encode(article_id)
        );
        let tree = self.get(&path, true).await?;
        Ok(extract::extract_article_details(&tree, article_id))
    }

    /// Category the article is filed under, as returned by the storefront.
    ///
    /// `GET /articles/{id}/category`
    pub async fn get_article_category(&self, article_id: &str) -> Result<Value, Error> {
        debug!(article_id, "fetching article category");
        self.get(&format!("/articles/{}/category", encode(article_id)), false)
            .await
    }
}
