use eyre::Result;
use tracing::info;

use crate::{
    cache::Cache,
    commands::command::{fetch_console_text, Grouping},
    group::GroupedFailures,
    jenkins::{find_builds, Build, BuildLogProvider},
    present::format_grouped,
    term::{bold, print_header},
};

/// Fetch the console output of a build and group it.
pub async fn list_build_failures(
    provider: &dyn BuildLogProvider,
    cache: Option<&Cache>,
    job: &str,
    number: u64,
    grouping: &Grouping,
) -> Result<(Build, GroupedFailures)> {
    let build = find_builds(provider, job, &[number])
        .await?
        .remove(0);
    let text = fetch_console_text(provider, cache, &build).await?;
    let grouped = grouping.apply(&text)?;
    info!(keys = grouped.len(), "grouped console output");
    Ok((build, grouped))
}

pub async fn list(
    provider: &dyn BuildLogProvider,
    cache: Option<&Cache>,
    job: &str,
    number: u64,
    grouping: &Grouping,
) -> Result<()> {
    let (build, grouped) = list_build_failures(provider, cache, job, number, grouping).await?;

    if grouped.is_empty() {
        eprintln!(
            "No matches for /{}/ in console output of {}",
            grouping.regex,
            bold(&format!("#{}", build.number))
        );
        return Ok(());
    }

    print_header(&format!(
        "{} {}\n{} #{}",
        bold("Job:"),
        build.job,
        bold("Build:"),
        build.number
    ));
    print!("{}", format_grouped(&grouped));
    Ok(())
}
