//! `oak dashboard`.

use oakline_client::load_dashboard;

use super::Context;
use crate::error::{CliError, RequestExt};
use crate::output::print_json;

pub async fn run(ctx: &Context) -> Result<(), CliError> {
    ctx.require_admin().await?;
    let snapshot = load_dashboard(ctx.client())
        .await
        .for_action("load dashboard")?;
    print_json(&snapshot)
}
