//! User command handler.

use picnic_api::StorefrontClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &StorefrontClient, global: &GlobalOpts) -> Result<(), CliError> {
    let user = client.get_user().await?;
    let out = output::render_value(&global.output, &user);
    output::print_output(&out, global.quiet);
    Ok(())
}
