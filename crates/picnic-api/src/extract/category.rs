// Store catalog

use serde_json::Value;

use crate::models::Category;
use crate::query::{self, scalar_text, str_field};

/// Top-level categories of a `/my_store` response.
///
/// Nodes without an id are skipped along with their subtree.
pub fn extract_catalog(tree: &Value) -> Vec<Category> {
    tree.get("catalog")
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().filter_map(category).collect())
        .unwrap_or_default()
}

fn category(node: &Value) -> Option<Category> {
    Some(Category {
        id: node.get("id").and_then(scalar_text)?,
        name: str_field(node, "name").map(query::strip_color_markup),
        kind: str_field(node, "type").map(String::from),
        children: node
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(category).collect())
            .unwrap_or_default(),
    })
}

/// Render categories as an indented tree, one line per node.
///
/// ```text
/// Zuivel (1000)
/// ├── Melk (1001)
/// └── Kaas (1002)
/// ```
pub fn render_tree(categories: &[Category]) -> Vec<String> {
    let mut lines = Vec::new();
    for category in categories {
        lines.push(category.label());
        render_children(&category.children, "", &mut lines);
    }
    lines
}

fn render_children(children: &[Category], prefix: &str, lines: &mut Vec<String>) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!("{prefix}{branch}{}", child.label()));
        render_children(&child.children, &format!("{prefix}{indent}"), lines);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn catalog() -> Value {
        json!({
            "type": "MY_STORE",
            "catalog": [
                {
                    "type": "CATEGORY",
                    "id": "1000",
                    "name": "Zuivel",
                    "items": [
                        { "type": "CATEGORY", "id": "1001", "name": "Melk", "items": [
                            { "type": "SINGLE_ARTICLE", "id": "s1", "name": "Halfvolle melk" }
                        ]},
                        { "type": "CATEGORY", "id": "1002", "name": "Kaas" }
                    ]
                },
                { "type": "CATEGORY", "id": 2000 },
                { "name": "no id" }
            ]
        })
    }

    #[test]
    fn parses_nested_catalog() {
        let categories = extract_catalog(&catalog());

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name.as_deref(), Some("Zuivel"));
        assert_eq!(categories[0].children[0].children[0].kind.as_deref(), Some("SINGLE_ARTICLE"));
        assert_eq!(categories[1].id, "2000");
        assert!(categories[1].children.is_empty());
    }

    #[test]
    fn missing_catalog_is_empty() {
        assert!(extract_catalog(&json!({ "user_id": "u" })).is_empty());
    }

    #[test]
    fn renders_tree_with_branch_glyphs() {
        let lines = render_tree(&extract_catalog(&catalog()));
        assert_eq!(
            lines,
            [
                "Zuivel (1000)",
                "├── Melk (1001)",
                "│   └── Halfvolle melk (s1)",
                "└── Kaas (1002)",
                "2000",
            ]
        );
    }
}
