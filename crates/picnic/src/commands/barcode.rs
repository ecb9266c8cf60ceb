//! Barcode command handler.

use picnic_api::StorefrontClient;

use crate::cli::{BarcodeArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &StorefrontClient,
    args: BarcodeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let article = client
        .get_article_by_gtin(&args.code, args.max_redirects)
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "barcode".into(),
            identifier: args.code.clone(),
            hint: "The storefront does not sell a product with this code, or the redirect \
                   chain is longer than --max-redirects."
                .into(),
        })?;

    let out = output::render_single(
        &global.output,
        &article,
        |a| format!("{} {}", output::heading(&a.name, color), output::dim(&a.id, color)),
        |a| a.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
