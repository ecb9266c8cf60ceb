// Recipe endpoints

use tracing::debug;

use crate::error::Error;
use crate::extract;
use crate::models::{RecipeDetails, RecipeSummary};
use crate::storefront::articles::encode;
use crate::storefront::client::StorefrontClient;

impl StorefrontClient {
    /// Recipe search.
    ///
    /// `GET /pages/search-page-results?search_term={term}&page_context=MEALS&is_recipe=true`
    pub async fn search_recipes(&self, term: &str) -> Result<Vec<RecipeSummary>, Error> {
        debug!(term, "searching recipes");
        let path = format!(
            "/pages/search-page-results?search_term={}&page_context=MEALS&is_recipe=true",
            encode(term)
        );
        let tree = self.get(&path, true).await?;
        Ok(extract::extract_recipe_results(&tree))
    }

    /// Recipe page contents.
    ///
    /// `GET /pages/recipe-details-page?recipe_id={id}`
    pub async fn get_recipe_details(&self, recipe_id: &str) -> Result<RecipeDetails, Error> {
        debug!(recipe_id, "fetching recipe");
        let path = format!("/pages/recipe-details-page?recipe_id={}", encode(recipe_id));
        let tree = self.get(&path, true).await?;
        Ok(extract::extract_recipe_details(&tree))
    }
}
