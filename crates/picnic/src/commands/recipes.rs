//! Recipe command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use picnic_api::{RecipeDetails, RecipeSummary, StorefrontClient};

use crate::cli::{GlobalOpts, RecipesArgs, RecipesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecipeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&RecipeSummary> for RecipeRow {
    fn from(r: &RecipeSummary) -> Self {
        Self {
            id: util::or_blank(r.recipe_id.as_deref()),
            name: r.name.clone(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(r: &RecipeDetails, color: bool) -> String {
    let mut out = String::new();
    if let Some(name) = r.name.first() {
        let _ = writeln!(out, "{}", output::heading(name, color));
    }
    if let Some(url) = r.url.first() {
        let _ = writeln!(out, "{}", output::dim(url, color));
    }
    for line in &r.description {
        let _ = writeln!(out, "{line}");
    }

    let lists = [
        ("Ingredients", &r.ingredients),
        ("Utensils", &r.utensils),
    ];
    for (title, items) in lists {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}", output::heading(title, color));
        for item in items {
            let _ = writeln!(out, "  • {item}");
        }
    }

    if !r.instructions.is_empty() {
        let _ = writeln!(out, "\n{}", output::heading("Instructions", color));
        for (step, text) in r.instructions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {text}", step + 1);
        }
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &StorefrontClient,
    args: RecipesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecipesCommand::Search { term } => {
            let results = client.search_recipes(&util::join_term(&term)).await?;
            let out = output::render_list(
                &global.output,
                &results,
                |r| RecipeRow::from(r),
                |r| util::or_blank(r.recipe_id.as_deref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecipesCommand::Show { id } => {
            let color = output::should_color(&global.color);
            let recipe = client.get_recipe_details(&id).await?;
            let out = output::render_single(
                &global.output,
                &recipe,
                |r| detail(r, color),
                |r| r.ingredients.join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
