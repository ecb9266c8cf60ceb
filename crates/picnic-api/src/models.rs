// Storefront domain records
//
// Typed results of the extractors. Every field an extractor may fail to
// locate is an `Option` or an empty collection; absence is data, not an
// error. Serialized field names follow the storefront's own snake_case keys
// so JSON output stays familiar to anyone who has read the raw pages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Articles ─────────────────────────────────────────────────────────

/// Basic article lookup: id plus display name (`"<producer> <product>"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub name: String,
}

/// Content of one product-page accordion section.
///
/// The nutrition accordion is laid out as stacked groups (one group per
/// table row); every other accordion is a flat run of texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccordionSection {
    Flat(Vec<String>),
    Grouped(Vec<Vec<String>>),
}

impl AccordionSection {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(items) => items.is_empty(),
            Self::Grouped(groups) => groups.is_empty(),
        }
    }

    /// All texts in reading order, groups flattened.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Flat(items) => items.iter().map(String::as_str).collect(),
            Self::Grouped(groups) => groups.iter().flatten().map(String::as_str).collect(),
        }
    }
}

/// Everything the product details page yields for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetails {
    pub id: String,
    /// `"<manufacturer> <product>"`, or the product alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Weight or unit quantity as printed, e.g. `"1 liter"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_unit_id: Option<String>,
    /// Category path, one to three levels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    /// Always serialized, even when empty.
    #[serde(default, rename = "product-description")]
    pub description: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    /// Accordion sections keyed by stable name (`preparation`,
    /// `nutritional_values`, `ingredients`, `info`).
    #[serde(flatten)]
    pub sections: IndexMap<String, AccordionSection>,
}

// ── Search ──────────────────────────────────────────────────────────

/// One product hit from the search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sole_article_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Price in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_quantity: Option<String>,
}

// ── Recipes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub name: String,
    pub recipe_id: Option<String>,
    pub image_id: Option<String>,
}

/// Recipe page contents. Every list is present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub ingredients: Vec<String>,
    pub utensils: Vec<String>,
    pub instructions: Vec<String>,
    pub description: Vec<String>,
    /// Portioning state entries, passed through untouched.
    pub articles: Vec<Value>,
    pub name: Vec<String>,
    pub url: Vec<String>,
}

// ── Catalog ─────────────────────────────────────────────────────────

/// A node of the store catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The storefront's node type (`CATEGORY`, `SINGLE_ARTICLE`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, rename = "items", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

impl Category {
    /// Display label used by the tree listing: `name (id)`, or the bare id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} ({})", self.id),
            None => self.id.clone(),
        }
    }
}
