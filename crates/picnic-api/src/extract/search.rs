// Product search extractor

use serde_json::Value;

use crate::models::SearchResult;
use crate::query::{self, descend_all, scalar_text, str_field};

/// Content type of a product tile on the search page.
pub const SELLING_UNIT_TILE: &str = "SELLING_UNIT_TILE";

/// Product hits from a search page, in page order.
///
/// Every node whose `content` is a selling-unit tile contributes one
/// result. The tile's article id is not on the selling unit itself, so it is
/// looked up anywhere beneath the tile.
pub fn extract_search_results(tree: &Value) -> Vec<SearchResult> {
    descend_all(tree)
        .filter_map(|node| {
            let content = node.get("content")?;
            if str_field(content, "type") != Some(SELLING_UNIT_TILE) {
                return None;
            }
            let unit = content.get("sellingUnit")?;
            Some(search_result(node, unit))
        })
        .collect()
}

fn search_result(tile: &Value, unit: &Value) -> SearchResult {
    let text = |field: &str| unit.get(field).and_then(scalar_text);

    SearchResult {
        name: str_field(unit, "name")
            .map(query::strip_color_markup)
            .unwrap_or_default(),
        id: text("id"),
        sole_article_id: descend_all(tile)
            .filter_map(|node| node.get("sole_article_id"))
            .find_map(scalar_text),
        image_id: text("image_id"),
        display_price: unit.get("display_price").and_then(Value::as_i64),
        unit_quantity: text("unit_quantity"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tile(id: &str, name: &str, article: &str) -> Value {
        json!({
            "id": format!("tile-{id}"),
            "content": {
                "type": "SELLING_UNIT_TILE",
                "sellingUnit": {
                    "id": id,
                    "name": name,
                    "image_id": format!("img-{id}"),
                    "display_price": 129,
                    "unit_quantity": "1 liter"
                }
            },
            "pml": { "component": { "onPress": {
                "analytics": { "contexts": [{ "data": { "sole_article_id": article } }] }
            }}}
        })
    }

    #[test]
    fn picks_every_selling_unit_tile_in_order() {
        let tree = json!({
            "body": { "child": { "children": [
                { "id": "header", "content": { "type": "BANNER" } },
                tile("s1", "Halfvolle melk", "a1"),
                { "children": [ tile("s2", "#(#333333)Volle melk", "a2") ] }
            ]}}
        });

        let results = extract_search_results(&tree);

        assert_eq!(
            results,
            vec![
                SearchResult {
                    name: "Halfvolle melk".into(),
                    id: Some("s1".into()),
                    sole_article_id: Some("a1".into()),
                    image_id: Some("img-s1".into()),
                    display_price: Some(129),
                    unit_quantity: Some("1 liter".into()),
                },
                SearchResult {
                    name: "Volle melk".into(),
                    id: Some("s2".into()),
                    sole_article_id: Some("a2".into()),
                    image_id: Some("img-s2".into()),
                    display_price: Some(129),
                    unit_quantity: Some("1 liter".into()),
                },
            ]
        );
    }

    #[test]
    fn tile_without_selling_unit_is_skipped() {
        let tree = json!([{ "content": { "type": "SELLING_UNIT_TILE" } }]);
        assert!(extract_search_results(&tree).is_empty());
    }

    #[test]
    fn sparse_selling_unit_yields_sparse_result() {
        let tree = json!({ "content": { "type": "SELLING_UNIT_TILE", "sellingUnit": { "id": 77 } } });
        let results = extract_search_results(&tree);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "");
        assert_eq!(results[0].id.as_deref(), Some("77"));
        assert_eq!(results[0].sole_article_id, None);
    }
}
