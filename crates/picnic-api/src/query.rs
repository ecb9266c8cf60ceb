//! Structural queries over untyped JSON trees.
//!
//! The storefront's page trees have no stable schema; only local markers
//! (container `id`s, `type` tags) are dependable. Everything here works by
//! recursive descent plus predicates, so a marker is found wherever it sits.
//!
//! Traversal is depth-first, parent before children, in document order
//! (array order, object field order). Extractors rely on that order to pick
//! "the first" of several candidates, so it is part of the contract.
//!
//! Nothing in this module fails: a query that matches nothing yields an
//! empty iterator or `None`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Inline color annotations such as `#(#333333)` embedded in markdown.
static COLOR_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\(#[0-9a-fA-F]+\)").expect("Invalid color markup regex"));

/// Category deep links: `app.picnic://categories/<l1>[/l2/<l2>][/l3/<l3>]`.
pub static CATEGORY_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"app\.picnic://categories/(?<l1>[0-9]+)(?:/l2/(?<l2>[0-9]+))?(?:/l3/(?<l3>[0-9]+))?")
        .expect("Invalid category URI regex")
});

// ── Traversal ───────────────────────────────────────────────────────

/// Depth-first, pre-order iterator over a JSON tree.
///
/// Yields the root first, then every object value and array element
/// recursively, in the order they appear in the document.
pub struct Descendants<'a> {
    stack: Vec<&'a Value>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node {
            Value::Array(items) => self.stack.extend(items.iter().rev()),
            Value::Object(fields) => self.stack.extend(fields.values().rev()),
            _ => {}
        }
        Some(node)
    }
}

/// Every node reachable from `tree`, including `tree` itself.
pub fn descend_all(tree: &Value) -> Descendants<'_> {
    Descendants { stack: vec![tree] }
}

/// Keep only object-shaped nodes.
pub fn filter_objects<'a>(
    nodes: impl Iterator<Item = &'a Value>,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    nodes.filter_map(Value::as_object)
}

/// Keep nodes that satisfy `predicate`.
pub fn select_where<'a, P>(
    nodes: impl Iterator<Item = &'a Value>,
    mut predicate: P,
) -> impl Iterator<Item = &'a Value>
where
    P: FnMut(&Value) -> bool,
{
    nodes.filter(move |node| predicate(*node))
}

/// All object nodes beneath (and including) `tree`.
pub fn objects(tree: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    filter_objects(descend_all(tree))
}

/// All objects beneath `tree` whose `id` equals `id`.
pub fn find_by_id<'a>(tree: &'a Value, id: &'a str) -> impl Iterator<Item = &'a Value> {
    select_where(descend_all(tree), move |node| has_id(node, id))
}

/// The first object beneath `tree` whose `id` equals `id`.
pub fn first_by_id<'a>(tree: &'a Value, id: &str) -> Option<&'a Value> {
    descend_all(tree).find(|node| has_id(node, id))
}

/// All string values anywhere in `tree`.
pub fn strings(tree: &Value) -> impl Iterator<Item = &str> {
    descend_all(tree).filter_map(Value::as_str)
}

// ── Predicates ──────────────────────────────────────────────────────

/// `node.id == id`.
pub fn has_id(node: &Value, id: &str) -> bool {
    str_field(node, "id") == Some(id)
}

/// `node.type == kind`.
pub fn has_type(node: &Value, kind: &str) -> bool {
    str_field(node, "type") == Some(kind)
}

/// `node` is an object carrying `field` (any value, including `null`).
pub fn has_field(node: &Value, field: &str) -> bool {
    node.as_object().is_some_and(|o| o.contains_key(field))
}

/// A `RICH_TEXT` node with a string `markdown` field.
pub fn is_rich_text(node: &Value) -> bool {
    has_type(node, "RICH_TEXT") && str_field(node, "markdown").is_some()
}

/// String value of `node.field`, if `node` is an object and the field is a string.
pub fn str_field<'a>(node: &'a Value, field: &str) -> Option<&'a str> {
    node.get(field).and_then(Value::as_str)
}

/// Direct children of a UI node (its `children` array).
pub fn children(node: &Value) -> impl Iterator<Item = &Value> {
    node.get("children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// A string or number rendered as text; other values give `None`.
pub fn scalar_text(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Follow a fixed chain of object fields. Any missing link yields `None`.
pub fn path<'a>(node: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields.iter().try_fold(node, |current, field| current.get(*field))
}

// ── Text ────────────────────────────────────────────────────────────

/// Remove inline color annotations (`#(#RRGGBB)`) from `text`.
///
/// Runs to a fixed point, so removing one annotation cannot leave another
/// behind; applying it twice gives the same result as applying it once.
pub fn strip_color_markup(text: &str) -> String {
    let mut current = text.to_owned();
    while COLOR_MARKUP.is_match(&current) {
        current = COLOR_MARKUP.replace_all(&current, "").into_owned();
    }
    current
}

/// The cleaned `markdown` text of a `RICH_TEXT` node.
pub fn markdown_text(node: &Value) -> Option<String> {
    if is_rich_text(node) {
        str_field(node, "markdown").map(strip_color_markup)
    } else {
        None
    }
}

/// Cleaned text of every `RICH_TEXT` node beneath `tree`, in document order.
pub fn rich_texts(tree: &Value) -> impl Iterator<Item = String> + '_ {
    descend_all(tree).filter_map(markdown_text)
}

/// Cleaned text of every string `markdown` field beneath `tree`, whatever the
/// node's type.
pub fn markdown_fields(tree: &Value) -> impl Iterator<Item = String> + '_ {
    descend_all(tree)
        .filter_map(|node| str_field(node, "markdown"))
        .map(strip_color_markup)
}

// ── Capture ─────────────────────────────────────────────────────────

/// Match `pattern` against `text` and return its named groups.
///
/// Groups that did not participate in the match are left out of the map.
pub fn capture(pattern: &Regex, text: &str) -> Option<HashMap<String, String>> {
    let caps = pattern.captures(text)?;
    Some(
        pattern
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_owned(), m.as_str().to_owned()))
            })
            .collect(),
    )
}

/// Numeric category levels encoded in a category deep link.
///
/// `app.picnic://categories/110/l2/210` gives `[110, 210]`.
pub fn category_levels(text: &str) -> Option<Vec<u64>> {
    let groups = capture(&CATEGORY_URI, text)?;
    let levels = ["l1", "l2", "l3"]
        .iter()
        .filter_map(|level| groups.get(*level))
        .filter_map(|digits| digits.parse().ok())
        .collect::<Vec<u64>>();
    if levels.is_empty() { None } else { Some(levels) }
}

/// Append `item` unless an equal value is already present.
pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn descends_parent_before_children_in_document_order() {
        let tree = json!({
            "a": { "id": "first", "children": [{ "id": "second" }, { "id": "third" }] },
            "b": { "id": "fourth" }
        });

        let ids: Vec<&str> = descend_all(&tree)
            .filter_map(|node| str_field(node, "id"))
            .collect();

        assert_eq!(ids, ["first", "second", "third", "fourth"]);
    }

    #[test]
    fn descend_visits_every_node_once() {
        let tree = json!([1, [2, 3], { "k": 4 }]);
        // root, 1, [2,3], 2, 3, {k}, 4
        assert_eq!(descend_all(&tree).count(), 7);
    }

    #[test]
    fn select_by_id_returns_the_single_match() {
        let tree = json!({
            "body": { "children": [{ "id": "other" }, { "id": "X", "payload": 1 }] }
        });

        let hits: Vec<&Value> = select_where(descend_all(&tree), |n| has_id(n, "X")).collect();
        assert_eq!(hits, [&json!({ "id": "X", "payload": 1 })]);
    }

    #[test]
    fn select_by_id_with_no_match_is_empty() {
        let tree = json!({ "body": { "children": [{ "id": "other" }] } });
        assert_eq!(find_by_id(&tree, "X").count(), 0);
        assert!(first_by_id(&tree, "X").is_none());
    }

    #[test]
    fn queries_on_scalars_do_not_fail() {
        let tree = json!(42);
        assert_eq!(objects(&tree).count(), 0);
        assert!(path(&tree, &["a", "b"]).is_none());
        assert_eq!(rich_texts(&tree).count(), 0);
    }

    #[test]
    fn path_follows_fields() {
        let tree = json!({ "pml": { "component": { "children": [1] } } });
        assert_eq!(
            path(&tree, &["pml", "component", "children"]),
            Some(&json!([1]))
        );
        assert!(path(&tree, &["pml", "missing"]).is_none());
    }

    #[test]
    fn strips_color_markup() {
        assert_eq!(strip_color_markup("#(#333333)Milk#(#ffffff)"), "Milk");
        assert_eq!(strip_color_markup("1 #(#AbC)liter"), "1 liter");
    }

    #[test]
    fn stripping_is_idempotent() {
        for text in ["#(#a#(#b)b)x", "plain", "#(#12)#(#34)", "#(#zz)"] {
            let once = strip_color_markup(text);
            assert_eq!(strip_color_markup(&once), once);
        }
        assert_eq!(strip_color_markup("#(#a#(#b)b)x"), "x");
    }

    #[test]
    fn stripping_text_without_markup_is_a_no_op() {
        let text = "Halfvolle melk (1 liter) #1";
        assert_eq!(strip_color_markup(text), text);
    }

    #[test]
    fn markdown_only_from_rich_text() {
        let tree = json!([
            { "type": "RICH_TEXT", "markdown": "#(#000000)one" },
            { "type": "ICON", "markdown": "skip" },
            { "type": "RICH_TEXT" }
        ]);
        assert_eq!(rich_texts(&tree).collect::<Vec<_>>(), ["one"]);
        assert_eq!(markdown_fields(&tree).collect::<Vec<_>>(), ["one", "skip"]);
    }

    #[test]
    fn captures_category_levels() {
        assert_eq!(
            category_levels("app.picnic://categories/110/l2/210"),
            Some(vec![110, 210])
        );
        assert_eq!(category_levels("app.picnic://categories/110"), Some(vec![110]));
        assert_eq!(
            category_levels("app.picnic://categories/1/l2/2/l3/3"),
            Some(vec![1, 2, 3])
        );
        assert_eq!(category_levels("app.picnic://recipes/110"), None);
        assert_eq!(category_levels("categories/110"), None);
    }

    #[test]
    fn capture_omits_groups_that_did_not_match() {
        let groups = capture(&CATEGORY_URI, "app.picnic://categories/7").unwrap();
        assert_eq!(groups.get("l1").map(String::as_str), Some("7"));
        assert!(!groups.contains_key("l2"));
        assert!(capture(&CATEGORY_URI, "nothing here").is_none());
    }
}
