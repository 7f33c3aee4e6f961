//! `npmapi info`, `npmapi user` and `npmapi score`.

use npmapi_core::error::NpmResult;

use super::CommandContext;

/// Print the reshaped package summary as JSON
pub async fn info(name: &str, ctx: &CommandContext) -> NpmResult<()> {
    let package = ctx.client.get_package(name).await?;
    ctx.output.json(&package)
}

/// Print a registry user as JSON
pub async fn user(name: &str, ctx: &CommandContext) -> NpmResult<()> {
    let profile = ctx.client.get_user(name).await?;
    ctx.output.json(&profile)
}

/// Print the npms.io score of a package
pub async fn score(name: &str, ctx: &CommandContext) -> NpmResult<()> {
    match ctx.client.get_score(name).await? {
        Some(score) => ctx.output.json(&score),
        None => {
            ctx.output.warn(&format!("{} has not been analyzed yet", name));
            Ok(())
        }
    }
}
