// Article extractors
//
// The product details page is one large render tree. Each piece of the
// article (heading, images, accordions, ...) is pulled by an independent
// sub-query and merged into `ArticleDetails`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::models::{AccordionSection, Article, ArticleDetails};
use crate::query::{
    self, children, descend_all, find_by_id, first_by_id, has_field, has_type, is_rich_text,
    markdown_text, path, push_unique, rich_texts, scalar_text, str_field,
};

// ── Container anchors ────────────────────────────────────────────────

pub const MAIN_CONTAINER: &str = "product-details-page-root-main-container";
pub const ACCORDION_SECTION: &str = "accordion-section";
pub const ACCORDIONS: &str = "product-page-accordions";
pub const IMAGE_GALLERY: &str = "product-page-image-gallery-main-image-container";
pub const DESCRIPTION: &str = "product-page-description";
pub const ALLERGIES: &str = "product-page-allergies";

/// Accordion icon keys and the section names they are published under.
/// Unlisted icon keys keep their raw name.
pub const SECTION_NAMES: [(&str, &str); 4] = [
    ("whisk", "preparation"),
    ("apple", "nutritional_values"),
    ("list", "ingredients"),
    ("infoCircle", "info"),
];

/// The accordion whose body is laid out as stacked groups.
const GROUPED_ICON: &str = "apple";

/// Stable section name for an accordion icon key.
pub fn section_name(icon_key: &str) -> &str {
    SECTION_NAMES
        .iter()
        .find(|(icon, _)| *icon == icon_key)
        .map_or(icon_key, |(_, name)| name)
}

// ── Summary ─────────────────────────────────────────────────────────

/// Basic article: product name and producer from the main container.
///
/// Returns `None` when the main container is missing or has no children.
pub fn extract_article(tree: &Value, article_id: &str) -> Option<Article> {
    let items = main_children(tree)?;
    if items.is_empty() {
        return None;
    }

    let text_at = |index: usize| {
        items
            .get(index)
            .and_then(|node| str_field(node, "markdown"))
            .map(query::strip_color_markup)
    };

    let heading = Heading {
        product: text_at(0),
        manufacturer: text_at(1),
        quantity: None,
    };

    Some(Article {
        id: article_id.to_owned(),
        name: heading.display_name().unwrap_or_default(),
    })
}

// ── Details ─────────────────────────────────────────────────────────

/// Full article details from the product details page.
///
/// Returns `None` when no sub-query found anything. The description is
/// always present on a returned record, but an empty description alone does
/// not make the record non-empty.
pub fn extract_article_details(tree: &Value, article_id: &str) -> Option<ArticleDetails> {
    let heading = heading(tree);
    let details = ArticleDetails {
        id: article_id.to_owned(),
        name: heading.display_name(),
        product: heading.product,
        manufacturer: heading.manufacturer,
        quantity: heading.quantity,
        image_ids: image_ids(tree),
        selling_unit_id: selling_unit_id(tree),
        categories: categories(tree),
        description: description(tree),
        allergies: allergies(tree),
        sections: accordion_sections(tree),
    };

    has_content(&details).then_some(details)
}

fn has_content(details: &ArticleDetails) -> bool {
    details.product.is_some()
        || details.manufacturer.is_some()
        || details.quantity.is_some()
        || details.selling_unit_id.is_some()
        || !details.image_ids.is_empty()
        || !details.categories.is_empty()
        || !details.description.is_empty()
        || !details.allergies.is_empty()
        || !details.sections.is_empty()
}

/// Children of the main container's component.
fn main_children(tree: &Value) -> Option<&Vec<Value>> {
    let container = first_by_id(tree, MAIN_CONTAINER)?;
    path(container, &["pml", "component", "children"])?.as_array()
}

#[derive(Debug, Default)]
struct Heading {
    product: Option<String>,
    manufacturer: Option<String>,
    quantity: Option<String>,
}

impl Heading {
    fn display_name(&self) -> Option<String> {
        match (&self.manufacturer, &self.product) {
            (Some(manufacturer), Some(product)) if !manufacturer.is_empty() => {
                Some(format!("{manufacturer} {product}"))
            }
            (Some(manufacturer), None) if !manufacturer.is_empty() => Some(manufacturer.clone()),
            (_, product) => product.clone(),
        }
    }
}

/// Product name, manufacturer, and quantity from the main container.
///
/// The first child is the product name. The second child is the
/// manufacturer only when it is plain styled text (no heading `textType`,
/// but `textAttributes` present). The quantity is the first text directly
/// inside any `STACK` child.
fn heading(tree: &Value) -> Heading {
    let Some(items) = main_children(tree) else {
        return Heading::default();
    };

    let product = items.first().and_then(markdown_text);

    let manufacturer = items
        .get(1)
        .filter(|node| is_manufacturer(node))
        .and_then(markdown_text);

    let quantity = items
        .iter()
        .filter(|node| has_type(node, "STACK"))
        .flat_map(children)
        .find_map(markdown_text);

    Heading {
        product,
        manufacturer,
        quantity,
    }
}

fn is_manufacturer(node: &Value) -> bool {
    is_rich_text(node)
        && node.get("textType").is_none_or(Value::is_null)
        && has_field(node, "textAttributes")
}

/// Image ids under the main gallery, in document order, duplicates kept.
fn image_ids(tree: &Value) -> Vec<String> {
    let Some(gallery) = first_by_id(tree, IMAGE_GALLERY) else {
        return Vec::new();
    };
    descend_all(gallery)
        .filter(|node| has_type(node, "IMAGE"))
        .filter_map(|node| path(node, &["source", "id"]))
        .filter_map(Value::as_str)
        .map(String::from)
        .collect()
}

/// First selling unit id reported by any analytics context.
fn selling_unit_id(tree: &Value) -> Option<String> {
    descend_all(tree)
        .filter_map(|node| node.get("analytics"))
        .filter_map(|analytics| analytics.get("contexts"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|context| context.get("data")?.get("selling_unit_id"))
        .find_map(scalar_text)
}

/// Category path from the first `target` deep link in the page.
fn categories(tree: &Value) -> Vec<u64> {
    descend_all(tree)
        .filter_map(|node| str_field(node, "target"))
        .find_map(query::category_levels)
        .unwrap_or_default()
}

fn description(tree: &Value) -> Vec<String> {
    find_by_id(tree, DESCRIPTION).flat_map(rich_texts).collect()
}

fn allergies(tree: &Value) -> Vec<String> {
    let mut allergies = Vec::new();
    for text in find_by_id(tree, ALLERGIES).flat_map(rich_texts) {
        push_unique(&mut allergies, text);
    }
    allergies
}

// ── Accordions ──────────────────────────────────────────────────────

/// Accordion sections keyed by stable section name. Empty sections are
/// dropped; a repeated icon key keeps the last section seen.
fn accordion_sections(tree: &Value) -> IndexMap<String, AccordionSection> {
    let mut sections = IndexMap::new();
    let items = find_by_id(tree, ACCORDION_SECTION)
        .flat_map(|section| find_by_id(section, ACCORDIONS))
        .filter_map(|accordions| path(accordions, &["pml", "component", "items"]))
        .filter_map(Value::as_array)
        .flatten();

    for item in items {
        let Some(icon) = icon_key(item) else {
            continue;
        };
        let content = if icon == GROUPED_ICON {
            grouped_texts(item)
        } else {
            let texts = item.get("body").map(|body| rich_texts(body).collect());
            AccordionSection::Flat(texts.unwrap_or_default())
        };
        if !content.is_empty() {
            sections.insert(section_name(icon).to_owned(), content);
        }
    }

    sections
}

/// The icon key in an accordion item's header.
fn icon_key(item: &Value) -> Option<&str> {
    let header = item.get("header")?;
    descend_all(header)
        .filter(|node| has_type(node, "ICON"))
        .find_map(|node| str_field(node, "iconKey"))
}

/// One group per `STACK` row of the item body: the texts directly inside it.
/// Stacks nested within a row are not groups of their own.
fn grouped_texts(item: &Value) -> AccordionSection {
    let Some(rows) = path(item, &["body", "child"]) else {
        return AccordionSection::Grouped(Vec::new());
    };
    let groups = children(rows)
        .filter(|node| has_type(node, "STACK"))
        .map(|stack| children(stack).filter_map(markdown_text).collect::<Vec<_>>())
        .filter(|group| !group.is_empty())
        .collect();
    AccordionSection::Grouped(groups)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn rich(markdown: &str) -> Value {
        json!({ "type": "RICH_TEXT", "markdown": markdown })
    }

    fn page(main_children: &Value) -> Value {
        json!({
            "body": { "child": { "child": { "children": [
                {
                    "id": MAIN_CONTAINER,
                    "pml": { "component": { "children": main_children } }
                }
            ]}}}
        })
    }

    fn product_page() -> Value {
        json!({
            "body": { "child": { "child": { "children": [
                {
                    "id": "product-page-image-gallery-main-image-container",
                    "children": [
                        { "type": "IMAGE", "source": { "id": "img-1" } },
                        { "type": "STACK", "children": [
                            { "type": "IMAGE", "source": { "id": "img-2" } },
                            { "type": "IMAGE", "source": { "id": "img-1" } }
                        ]}
                    ]
                },
                {
                    "id": MAIN_CONTAINER,
                    "pml": { "component": { "children": [
                        { "type": "RICH_TEXT", "textType": "HEADER1", "markdown": "#(#333333)Halfvolle melk" },
                        { "type": "RICH_TEXT", "textAttributes": { "color": "#999" }, "markdown": "Campina" },
                        { "type": "STACK", "children": [
                            { "type": "ICON", "iconKey": "scale" },
                            { "type": "RICH_TEXT", "markdown": "#(#666666)1 liter" }
                        ]}
                    ]}}
                },
                {
                    "id": "category-link",
                    "target": "app.picnic://categories/1000/l2/2000/l3/3000"
                },
                {
                    "id": "secondary",
                    "target": "app.picnic://categories/9"
                },
                {
                    "analytics": { "contexts": [
                        { "schema": "page" },
                        { "data": { "selling_unit_id": "s1001" } }
                    ]}
                },
                {
                    "analytics": { "contexts": [ { "data": { "selling_unit_id": "s2002" } } ] }
                },
                {
                    "id": "product-page-description",
                    "children": [rich("Verse melk."), rich("Gekoeld bewaren.")]
                },
                {
                    "id": "product-page-allergies",
                    "children": [rich("Melk"), rich("Melk"), rich("Lactose")]
                },
                {
                    "id": ACCORDION_SECTION,
                    "children": [{
                        "id": ACCORDIONS,
                        "pml": { "component": { "items": [
                            {
                                "header": { "child": { "children": [ { "type": "ICON", "iconKey": "list" } ] } },
                                "body": { "child": { "children": [ rich("Melk, vitamine D") ] } }
                            },
                            {
                                "header": { "child": { "children": [ { "type": "ICON", "iconKey": "apple" } ] } },
                                "body": { "child": { "children": [
                                    { "type": "STACK", "children": [ rich("Energie"), rich("192 kJ") ] },
                                    { "type": "STACK", "children": [ { "type": "ICON", "iconKey": "dot" } ] },
                                    { "type": "STACK", "children": [ rich("Vet"), rich("1,5 g") ] }
                                ]}}
                            },
                            {
                                "header": { "child": { "children": [ { "type": "ICON", "iconKey": "infoCircle" } ] } },
                                "body": { "child": { "children": [] } }
                            },
                            {
                                "header": { "child": { "children": [ { "type": "ICON", "iconKey": "truck" } ] } },
                                "body": { "child": { "children": [ rich("#(#ff0000)Gratis bezorgd") ] } }
                            },
                            {
                                "header": { "child": { "children": [ { "type": "RICH_TEXT", "markdown": "no icon" } ] } },
                                "body": { "child": { "children": [ rich("orphan") ] } }
                            }
                        ]}}
                    }]
                }
            ]}}}
        })
    }

    #[test]
    fn section_names_are_renamed_by_table() {
        assert_eq!(section_name("whisk"), "preparation");
        assert_eq!(section_name("apple"), "nutritional_values");
        assert_eq!(section_name("list"), "ingredients");
        assert_eq!(section_name("infoCircle"), "info");
        assert_eq!(section_name("truck"), "truck");
    }

    #[test]
    fn summary_combines_producer_and_name() {
        let tree = page(&json!([rich("#(#111111)Halfvolle melk"), rich("Campina")]));
        let article = extract_article(&tree, "s100").unwrap();
        assert_eq!(
            article,
            Article {
                id: "s100".into(),
                name: "Campina Halfvolle melk".into(),
            }
        );
    }

    #[test]
    fn summary_without_producer_is_product_alone() {
        let tree = page(&json!([rich("Bananen")]));
        assert_eq!(extract_article(&tree, "s1").unwrap().name, "Bananen");
    }

    #[test]
    fn summary_of_empty_container_is_no_data() {
        assert!(extract_article(&page(&json!([])), "s1").is_none());
        assert!(extract_article(&json!({ "body": {} }), "s1").is_none());
    }

    #[test]
    fn details_of_empty_container_is_no_data() {
        assert!(extract_article_details(&page(&json!([])), "s1").is_none());
        assert!(extract_article_details(&json!({}), "s1").is_none());
    }

    #[test]
    fn details_merge_every_partial() {
        let details = extract_article_details(&product_page(), "s100").unwrap();

        assert_eq!(details.id, "s100");
        assert_eq!(details.product.as_deref(), Some("Halfvolle melk"));
        assert_eq!(details.manufacturer.as_deref(), Some("Campina"));
        assert_eq!(details.name.as_deref(), Some("Campina Halfvolle melk"));
        assert_eq!(details.quantity.as_deref(), Some("1 liter"));
        assert_eq!(details.image_ids, ["img-1", "img-2", "img-1"]);
        assert_eq!(details.selling_unit_id.as_deref(), Some("s1001"));
        assert_eq!(details.categories, [1000, 2000, 3000]);
        assert_eq!(details.description, ["Verse melk.", "Gekoeld bewaren."]);
        assert_eq!(details.allergies, ["Melk", "Lactose"]);
    }

    #[test]
    fn details_rename_and_group_accordions() {
        let details = extract_article_details(&product_page(), "s100").unwrap();

        let keys: Vec<&str> = details.sections.keys().map(String::as_str).collect();
        assert_eq!(keys, ["ingredients", "nutritional_values", "truck"]);

        assert_eq!(
            details.sections["ingredients"],
            AccordionSection::Flat(vec!["Melk, vitamine D".into()])
        );
        assert_eq!(
            details.sections["nutritional_values"],
            AccordionSection::Grouped(vec![
                vec!["Energie".into(), "192 kJ".into()],
                vec!["Vet".into(), "1,5 g".into()],
            ])
        );
        assert_eq!(
            details.sections["truck"],
            AccordionSection::Flat(vec!["Gratis bezorgd".into()])
        );
    }

    #[test]
    fn heading_styled_as_title_is_not_a_manufacturer() {
        let tree = page(&json!([
            { "type": "RICH_TEXT", "textType": "HEADER1", "markdown": "Appels" },
            { "type": "RICH_TEXT", "textType": "BODY", "textAttributes": {}, "markdown": "Elstar" }
        ]));
        let details = extract_article_details(&tree, "s1").unwrap();
        assert_eq!(details.manufacturer, None);
        assert_eq!(details.name.as_deref(), Some("Appels"));
        assert_eq!(details.quantity, None);
    }

    #[test]
    fn description_is_always_serialized() {
        let tree = json!({ "x": { "target": "app.picnic://categories/5" } });
        let details = extract_article_details(&tree, "s1").unwrap();
        assert!(details.description.is_empty());

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["product-description"], json!([]));
        assert_eq!(json["categories"], json!([5]));
        assert!(json.get("image_ids").is_none());
    }

    fn accordion(icon: &str, rows: &Value) -> Value {
        json!({
            "header": { "child": { "children": [ { "type": "ICON", "iconKey": icon } ] } },
            "body": { "child": { "children": rows } }
        })
    }

    fn accordion_section(items: &Value) -> Value {
        json!({
            "id": ACCORDION_SECTION,
            "children": [{ "id": ACCORDIONS, "pml": { "component": { "items": items } } }]
        })
    }

    #[test]
    fn nested_stacks_do_not_form_their_own_group() {
        let item = accordion(
            "apple",
            &json!([{ "type": "STACK", "children": [
                rich("Energie"),
                { "type": "STACK", "children": [ rich("192 kJ"), rich("46 kcal") ] }
            ]}]),
        );
        assert_eq!(
            grouped_texts(&item),
            AccordionSection::Grouped(vec![vec!["Energie".into()]])
        );
    }

    #[test]
    fn every_accordion_section_contributes() {
        let tree = json!({ "body": { "child": { "child": { "children": [
            accordion_section(&json!([accordion("list", &json!([rich("Appel")]))])),
            accordion_section(&json!([accordion("whisk", &json!([rich("Schillen")]))]))
        ]}}}});
        let sections = accordion_sections(&tree);
        let keys: Vec<&str> = sections.keys().map(String::as_str).collect();
        assert_eq!(keys, ["ingredients", "preparation"]);
    }

    #[test]
    fn categories_come_from_target_links_only() {
        let tree = json!({
            "share": { "url": "app.picnic://categories/7" },
            "tile": { "target": "app.picnic://categories/1000/l2/2000" }
        });
        assert_eq!(categories(&tree), [1000, 2000]);
    }

    #[test]
    fn sections_flatten_into_the_serialized_record() {
        let details = extract_article_details(&product_page(), "s100").unwrap();
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["ingredients"], json!(["Melk, vitamine D"]));
        assert_eq!(json["nutritional_values"][1], json!(["Vet", "1,5 g"]));
    }
}
