use eyre::Result;
use tracing::info;

use crate::{
    cache::Cache,
    commands::command::{fetch_console_text, Grouping},
    diff::{diff, DiffResult},
    jenkins::{find_builds, BuildLogProvider},
    present::format_diff,
    term::{bold, green},
};

/// Fetch the console output of builds A and B, group both and compare the groupings.
pub async fn diff_builds(
    provider: &dyn BuildLogProvider,
    cache: Option<&Cache>,
    job: &str,
    build_a: u64,
    build_b: u64,
    grouping: &Grouping,
) -> Result<DiffResult> {
    let builds = find_builds(provider, job, &[build_a, build_b]).await?;
    let (text_a, text_b) = futures::try_join!(
        fetch_console_text(provider, cache, &builds[0]),
        fetch_console_text(provider, cache, &builds[1]),
    )?;

    let grouped_a = grouping.apply(&text_a)?;
    let grouped_b = grouping.apply(&text_b)?;
    info!(
        keys_a = grouped_a.len(),
        keys_b = grouped_b.len(),
        "grouped console output"
    );

    Ok(diff(&grouped_a, &grouped_b))
}

pub async fn diff_command(
    provider: &dyn BuildLogProvider,
    cache: Option<&Cache>,
    job: &str,
    build_a: u64,
    build_b: u64,
    grouping: &Grouping,
    color: bool,
) -> Result<()> {
    let result = diff_builds(provider, cache, job, build_a, build_b, grouping).await?;

    print!("{}", format_diff(&result, color));

    if !result.has_differences() {
        eprintln!(
            "{}  Builds {} and {} have the same failures",
            green("✓"),
            bold(&format!("#{}", build_a)),
            bold(&format!("#{}", build_b))
        );
    }
    Ok(())
}
