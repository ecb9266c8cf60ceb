// Domain extractors
//
// Each extractor turns one decoded storefront page into one typed record
// using the primitives in `crate::query`. Extractors never fail: a missing
// marker produces `None` or empty fields.

pub mod article;
pub mod category;
pub mod recipe;
pub mod search;

pub use article::{extract_article, extract_article_details, section_name};
pub use category::{extract_catalog, render_tree};
pub use recipe::{extract_recipe_details, extract_recipe_results};
pub use search::extract_search_results;
