// Recipe extractors

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::{RecipeDetails, RecipeSummary};
use crate::query::{
    self, children, descend_all, find_by_id, has_type, is_rich_text, markdown_fields, path,
    scalar_text, str_field,
};

pub const RECIPE_RESULTS: &str = "search-flat-recipes-result";
pub const INGREDIENTS: &str = "recipe-core-ingredients-details-section";
pub const UTENSILS: &str = "recipe-ingredients-utensils";
pub const INSTRUCTIONS: &str = "recipe-details-instructions-section";
pub const DESCRIPTION: &str = "recipe-description-section";
pub const PORTIONING: &str = "recipe-portioning-content-wrapper";

/// Shareable recipe links embedded somewhere in the page.
static RECIPE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://picnic[.]app/de/go/[A-Za-z0-9]+").expect("Invalid recipe link regex")
});

/// Recipe hits from a recipe search page.
///
/// Each child of a `search-flat-recipes-result` container is one recipe:
/// its accessibility label is the name, and the first `recipe_id` and first
/// image source found beneath it identify the recipe.
pub fn extract_recipe_results(tree: &Value) -> Vec<RecipeSummary> {
    find_by_id(tree, RECIPE_RESULTS)
        .flat_map(children)
        .map(|item| RecipeSummary {
            name: path(item, &["pml", "component", "accessibilityLabel"])
                .and_then(Value::as_str)
                .map(query::strip_color_markup)
                .unwrap_or_default(),
            recipe_id: descend_all(item)
                .filter_map(|node| node.get("recipe_id"))
                .find_map(scalar_text),
            image_id: descend_all(item)
                .filter(|node| has_type(node, "IMAGE"))
                .filter_map(|node| path(node, &["source", "id"]))
                .find_map(scalar_text),
        })
        .collect()
}

/// Recipe page contents. Every query runs independently over the whole page
/// and contributes a (possibly empty) list.
pub fn extract_recipe_details(tree: &Value) -> RecipeDetails {
    RecipeDetails {
        ingredients: section_texts(tree, INGREDIENTS),
        utensils: section_texts(tree, UTENSILS),
        instructions: section_texts(tree, INSTRUCTIONS),
        description: section_texts(tree, DESCRIPTION),
        articles: portioned_articles(tree),
        name: descend_all(tree)
            .filter(|node| is_rich_text(node) && str_field(node, "textType") == Some("HEADLINE1"))
            .filter_map(|node| str_field(node, "markdown"))
            .map(query::strip_color_markup)
            .collect(),
        url: query::strings(tree)
            .filter_map(|text| RECIPE_LINK.find(text))
            .map(|m| m.as_str().to_owned())
            .collect(),
    }
}

fn section_texts(tree: &Value, id: &str) -> Vec<String> {
    find_by_id(tree, id).flat_map(markdown_fields).collect()
}

/// Entries of every `ingredientsState` beneath the portioning wrapper.
fn portioned_articles(tree: &Value) -> Vec<Value> {
    find_by_id(tree, PORTIONING)
        .flat_map(descend_all)
        .filter_map(|node| node.get("ingredientsState"))
        .flat_map(|state| match state {
            Value::Array(items) => items.clone(),
            Value::Object(fields) => fields.values().cloned().collect(),
            _ => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn recipe_search_pulls_label_id_and_image() {
        let tree = json!({
            "body": { "children": [{
                "id": "search-flat-recipes-result",
                "children": [{
                    "pml": { "component": {
                        "accessibilityLabel": "Pasta Bake",
                        "child": { "onPress": { "action": { "recipe_id": "R1" } } },
                        "children": [{ "type": "IMAGE", "source": { "id": "IMG1" } }]
                    }}
                }]
            }]}
        });

        assert_eq!(
            extract_recipe_results(&tree),
            vec![RecipeSummary {
                name: "Pasta Bake".into(),
                recipe_id: Some("R1".into()),
                image_id: Some("IMG1".into()),
            }]
        );
    }

    #[test]
    fn recipe_search_skips_null_ids() {
        let tree = json!({
            "id": "search-flat-recipes-result",
            "children": [{
                "a": { "recipe_id": null },
                "b": { "recipe_id": "R2" },
                "c": { "type": "IMAGE", "source": {} },
                "d": { "type": "IMAGE", "source": { "id": "IMG2" } }
            }]
        });

        let results = extract_recipe_results(&tree);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "");
        assert_eq!(results[0].recipe_id.as_deref(), Some("R2"));
        assert_eq!(results[0].image_id.as_deref(), Some("IMG2"));
    }

    #[test]
    fn recipe_search_without_container_is_empty() {
        assert!(extract_recipe_results(&json!({ "body": {} })).is_empty());
    }

    #[test]
    fn recipe_details_run_every_query() {
        let tree = json!({
            "body": { "children": [
                { "type": "RICH_TEXT", "textType": "HEADLINE1", "markdown": "#(#000000)Pasta Bake" },
                { "id": "recipe-description-section", "children": [
                    { "type": "RICH_TEXT", "markdown": "Romig en snel." }
                ]},
                { "id": "recipe-core-ingredients-details-section", "children": [
                    { "type": "RICH_TEXT", "markdown": "200 g penne" },
                    { "type": "TEXT", "markdown": "1 ui" },
                    { "type": "RICH_TEXT", "markdown": null }
                ]},
                { "id": "recipe-ingredients-utensils", "children": [
                    { "markdown": "Ovenschaal" }
                ]},
                { "id": "recipe-portioning-content-wrapper", "pml": {
                    "state": { "ingredientsState": [ { "id": "s1", "count": 1 }, { "id": "s2", "count": 2 } ] },
                    "other": { "ingredientsState": null }
                }},
                { "share": "Bekijk https://picnic.app/de/go/AbC123 nu" }
            ]}
        });

        let details = extract_recipe_details(&tree);

        assert_eq!(details.name, ["Pasta Bake"]);
        assert_eq!(details.description, ["Romig en snel."]);
        assert_eq!(details.ingredients, ["200 g penne", "1 ui"]);
        assert_eq!(details.utensils, ["Ovenschaal"]);
        assert!(details.instructions.is_empty());
        assert_eq!(
            details.articles,
            vec![json!({ "id": "s1", "count": 1 }), json!({ "id": "s2", "count": 2 })]
        );
        assert_eq!(details.url, ["https://picnic.app/de/go/AbC123"]);
    }

    #[test]
    fn recipe_details_of_empty_page_has_every_list() {
        let details = extract_recipe_details(&json!({}));
        assert_eq!(details, RecipeDetails::default());

        let json = serde_json::to_value(&details).unwrap();
        for key in ["ingredients", "utensils", "instructions", "description", "articles", "name", "url"] {
            assert_eq!(json[key], json!([]), "{key}");
        }
    }
}
