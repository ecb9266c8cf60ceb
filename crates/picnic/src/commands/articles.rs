//! Product search and article command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use picnic_api::{AccordionSection, Article, ArticleDetails, SearchResult, StorefrontClient};

use crate::cli::{ArticleArgs, ArticleCommand, GlobalOpts, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&SearchResult> for SearchRow {
    fn from(r: &SearchResult) -> Self {
        Self {
            id: util::or_blank(r.id.as_deref()),
            name: r.name.clone(),
            quantity: util::or_blank(r.unit_quantity.as_deref()),
            price: r.display_price.map(util::format_price).unwrap_or_default(),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn detail(d: &ArticleDetails, color: bool) -> String {
    let mut out = String::new();
    let title = d.name.as_deref().unwrap_or(&d.id);
    let _ = writeln!(out, "{} {}", output::heading(title, color), output::dim(&d.id, color));

    if let Some(ref quantity) = d.quantity {
        let _ = writeln!(out, "Quantity:    {quantity}");
    }
    if let Some(ref unit) = d.selling_unit_id {
        let _ = writeln!(out, "Product ID:  {unit}");
    }
    if !d.categories.is_empty() {
        let path: Vec<String> = d.categories.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "Categories:  {}", path.join(" > "));
    }
    if !d.allergies.is_empty() {
        let _ = writeln!(out, "Allergies:   {}", d.allergies.join(", "));
    }

    if !d.description.is_empty() {
        let _ = writeln!(out, "\n{}", output::heading("Description", color));
        for line in &d.description {
            let _ = writeln!(out, "  {line}");
        }
    }

    for (name, section) in &d.sections {
        let _ = writeln!(out, "\n{}", output::heading(name, color));
        match section {
            AccordionSection::Flat(lines) => {
                for line in lines {
                    let _ = writeln!(out, "  {line}");
                }
            }
            AccordionSection::Grouped(groups) => {
                for group in groups {
                    let _ = writeln!(out, "  {}", group.join("  "));
                }
            }
        }
    }

    out.trim_end().to_owned()
}

fn not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "article".into(),
        identifier: id.into(),
        hint: "Find article IDs with: picnic search <term>".into(),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn search(
    client: &StorefrontClient,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let results = client.search(&util::join_term(&args.term)).await?;
    let out = output::render_list(&global.output, &results, |r| SearchRow::from(r), |r| {
        util::or_blank(r.id.as_deref())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    client: &StorefrontClient,
    args: ArticleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ArticleCommand::Show { id } => {
            let article: Article = client.get_article(&id).await?.ok_or_else(|| not_found(&id))?;
            let out = output::render_single(
                &global.output,
                &article,
                |a| format!("{} {}", output::heading(&a.name, color), output::dim(&a.id, color)),
                |a| a.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ArticleCommand::Details { id } => {
            let details = client
                .get_article_details(&id)
                .await?
                .ok_or_else(|| not_found(&id))?;
            let out =
                output::render_single(&global.output, &details, |d| detail(d, color), |d| {
                    d.id.clone()
                });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ArticleCommand::Category { id } => {
            let tree = client.get_article_category(&id).await?;
            output::print_output(&output::render_value(&global.output, &tree), global.quiet);
            Ok(())
        }
    }
}
