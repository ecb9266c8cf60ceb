//! Delivery command handlers.

use serde_json::Value;
use tabled::Tabled;

use picnic_api::StorefrontClient;

use crate::cli::{DeliveriesArgs, DeliveriesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeliveryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Window")]
    window: String,
}

fn field(node: &Value, path: &[&str]) -> String {
    path.iter()
        .try_fold(node, |node, key| node.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

impl From<&Value> for DeliveryRow {
    fn from(d: &Value) -> Self {
        let start = field(d, &["slot", "window_start"]);
        let end = field(d, &["slot", "window_end"]);
        Self {
            id: field(d, &["delivery_id"]),
            status: field(d, &["status"]),
            window: if start.is_empty() {
                String::new()
            } else {
                format!("{start} – {end}")
            },
        }
    }
}

/// Summaries arrive as a JSON array; anything else is printed as-is.
fn render_summaries(summaries: &Value, global: &GlobalOpts) -> String {
    match (summaries.as_array(), &global.output) {
        (Some(list), OutputFormat::Table) => {
            let rows: Vec<DeliveryRow> = list.iter().map(DeliveryRow::from).collect();
            output::render_table(&rows)
        }
        (Some(list), OutputFormat::Plain) => list
            .iter()
            .map(|d| field(d, &["delivery_id"]))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_value(&global.output, summaries),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &StorefrontClient,
    args: DeliveriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        DeliveriesCommand::List { current, filter } => {
            let summaries = if current {
                client.get_current_deliveries().await?
            } else {
                let filter: Vec<&str> = filter.iter().map(String::as_str).collect();
                client.get_deliveries(&filter).await?
            };
            render_summaries(&summaries, global)
        }
        DeliveriesCommand::Show { id } => {
            output::render_value(&global.output, &client.get_delivery(&id).await?)
        }
        DeliveriesCommand::Scenario { id } => {
            output::render_value(&global.output, &client.get_delivery_scenario(&id).await?)
        }
        DeliveriesCommand::Position { id } => {
            output::render_value(&global.output, &client.get_delivery_position(&id).await?)
        }
        DeliveriesCommand::Slots => {
            output::render_value(&global.output, &client.get_delivery_slots().await?)
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn row_reads_slot_window() {
        let row = DeliveryRow::from(&json!({
            "delivery_id": "d-1",
            "status": "CURRENT",
            "slot": {"window_start": "2024-05-01T17:00", "window_end": "2024-05-01T18:00"}
        }));
        assert_eq!(row.id, "d-1");
        assert_eq!(row.status, "CURRENT");
        assert_eq!(row.window, "2024-05-01T17:00 – 2024-05-01T18:00");

        let bare = DeliveryRow::from(&json!({"delivery_id": "d-2"}));
        assert_eq!(bare.window, "");
    }
}
