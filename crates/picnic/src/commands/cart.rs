//! Cart command handlers.
//!
//! Cart responses are raw storefront trees. The table view pulls the order
//! lines out of them; every other format prints the tree unchanged.

use std::fmt::Write as _;

use serde_json::Value;
use tabled::Tabled;

use picnic_api::StorefrontClient;

use crate::cli::{CartArgs, CartCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Price")]
    price: String,
}

fn text(node: &Value, field: &str) -> String {
    node.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn price(node: &Value, field: &str) -> String {
    node.get(field)
        .and_then(Value::as_i64)
        .map(util::format_price)
        .unwrap_or_default()
}

/// One row per article of every order line.
fn cart_rows(cart: &Value) -> Vec<CartRow> {
    let lines = cart.get("items").and_then(Value::as_array);
    lines
        .into_iter()
        .flatten()
        .flat_map(|line| {
            let count = line
                .get("decorators")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .find(|d| d.get("type").and_then(Value::as_str) == Some("QUANTITY"))
                .and_then(|d| d.get("quantity"))
                .map(ToString::to_string)
                .unwrap_or_default();
            let line_price = price(line, "display_price");

            line.get("items")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .map(move |article| CartRow {
                    id: text(article, "id"),
                    name: text(article, "name"),
                    quantity: text(article, "unit_quantity"),
                    count: count.clone(),
                    price: line_price.clone(),
                })
        })
        .collect()
}

fn render_cart(cart: &Value, global: &GlobalOpts) -> String {
    if !matches!(global.output, OutputFormat::Table) {
        return output::render_value(&global.output, cart);
    }
    let mut out = output::render_table(&cart_rows(cart));
    let total = price(cart, "total_price");
    if !total.is_empty() {
        let _ = write!(out, "\nTotal: {total}");
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &StorefrontClient,
    args: CartArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cart = match args.command {
        CartCommand::Show => client.get_cart().await?,

        CartCommand::Add { product_id, count } => {
            let cart = client.add_product(&product_id, count).await?;
            if !global.quiet {
                eprintln!("✓ Added {count} × {product_id}");
            }
            cart
        }

        CartCommand::Remove { product_id, count } => {
            let cart = client.remove_product(&product_id, count).await?;
            if !global.quiet {
                eprintln!("✓ Removed {count} × {product_id}");
            }
            cart
        }

        CartCommand::Clear => {
            if !util::confirm("Remove everything from the cart?", global.yes)? {
                return Ok(());
            }
            let cart = client.clear_cart().await?;
            if !global.quiet {
                eprintln!("✓ Cart cleared");
            }
            cart
        }
    };

    output::print_output(&render_cart(&cart, global), global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_come_from_order_line_articles() {
        let cart = json!({
            "type": "ORDER",
            "total_price": 358,
            "items": [{
                "type": "ORDER_LINE",
                "display_price": 238,
                "decorators": [{"type": "QUANTITY", "quantity": 2}],
                "items": [{
                    "type": "ORDER_ARTICLE",
                    "id": "s1018231",
                    "name": "Halfvolle melk",
                    "unit_quantity": "1 liter"
                }]
            }]
        });

        let rows = cart_rows(&cart);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "s1018231");
        assert_eq!(rows[0].count, "2");
        assert_eq!(rows[0].price, "2.38");
        assert!(cart_rows(&json!({"items": []})).is_empty());
    }
}
