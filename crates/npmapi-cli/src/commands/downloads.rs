//! `npmapi downloads`, `npmapi today` and `npmapi yesterday`.

use chrono::NaiveDate;
use npmapi_core::error::{NpmError, NpmResult};
use npmapi_core::{today_utc, yesterday_utc};

use super::CommandContext;

/// Print daily downloads between two days, inclusive
pub async fn range(name: &str, start: NaiveDate, end: NaiveDate, ctx: &CommandContext) -> NpmResult<()> {
    if start > end {
        return Err(NpmError::ConfigValidation {
            field: "start".to_string(),
            reason: format!("{} is after {}", start, end),
        });
    }

    let downloads = ctx.client.get_downloads(name, start, end).await?;
    let total: u64 = downloads.iter().map(|entry| entry.downloads).sum();

    ctx.output
        .lines(downloads.iter().map(|entry| format!("{}\t{}", entry.day, entry.downloads)))?;
    ctx.output.info(&format!("{} downloads in total", total));
    Ok(())
}

/// Print today's downloads (UTC)
pub async fn today(name: &str, ctx: &CommandContext) -> NpmResult<()> {
    let downloads = ctx.client.get_today_downloads(name).await?;
    print_day(name, today_utc(), downloads, ctx)
}

/// Print yesterday's downloads (UTC)
pub async fn yesterday(name: &str, ctx: &CommandContext) -> NpmResult<()> {
    let downloads = ctx.client.get_yesterday_downloads(name).await?;
    print_day(name, yesterday_utc(), downloads, ctx)
}

fn print_day(name: &str, day: NaiveDate, downloads: Option<u64>, ctx: &CommandContext) -> NpmResult<()> {
    match downloads {
        Some(count) => ctx.output.lines([count.to_string()]),
        None => {
            ctx.output
                .warn(&format!("No download count for {} on {} yet", name, day));
            Ok(())
        }
    }
}
