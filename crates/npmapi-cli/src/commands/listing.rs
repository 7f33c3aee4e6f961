//! `npmapi all`, `npmapi updates` and `npmapi depended`.

use npmapi_core::error::{NpmError, NpmResult};
use npmapi_registry::DependedCount;
use std::time::Instant;

use super::CommandContext;

/// Stream the bulk listing and print every published package name
pub async fn all(min_count: Option<usize>, count_only: bool, ctx: &CommandContext) -> NpmResult<()> {
    let start_time = Instant::now();
    ctx.output.step("📦", "Streaming the bulk listing");

    let names = ctx.client.get_all().await?;
    check_min_count(names.len(), min_count)?;

    if count_only {
        ctx.output.lines([names.len().to_string()])?;
    } else {
        ctx.output.lines(&names)?;
    }

    ctx.output.success(&format!(
        "{} packages listed in {:.2}s",
        names.len(),
        start_time.elapsed().as_secs_f64()
    ));

    Ok(())
}

/// Print the names of packages updated today
pub async fn updates(ctx: &CommandContext) -> NpmResult<()> {
    let names = ctx.client.get_today_updates().await?;
    if names.is_empty() {
        ctx.output.warn("No updates listed for today");
        return Ok(());
    }
    ctx.output.lines(&names)
}

/// Print dependent counts, most depended-upon first when `top` is set
pub async fn depended(top: Option<usize>, ctx: &CommandContext) -> NpmResult<()> {
    let counts = top_depended(ctx.client.get_dependeds().await?, top);
    ctx.output
        .lines(counts.iter().map(|entry| format!("{}\t{}", entry.name, entry.count)))
}

/// Fail when a listing is smaller than the caller's sanity threshold
pub fn check_min_count(count: usize, minimum: Option<usize>) -> NpmResult<()> {
    match minimum {
        Some(minimum) if count < minimum => Err(NpmError::ListingTooSmall { count, minimum }),
        _ => Ok(()),
    }
}

/// Keep the `top` highest counts, ties broken by name
pub fn top_depended(mut counts: Vec<DependedCount>, top: Option<usize>) -> Vec<DependedCount> {
    if let Some(top) = top {
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        counts.truncate(top);
    }
    counts
}
