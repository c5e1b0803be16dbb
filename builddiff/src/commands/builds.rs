use eyre::Result;

use crate::{
    error::ConfigurationError,
    jenkins::{matching_builds, Build, BuildLogProvider, FieldPattern},
    term::{bold, dim, green, red, yellow},
};

/// Builds of the job that match every `FIELD=REGEX` filter.
pub async fn find_matching_builds(
    provider: &dyn BuildLogProvider,
    job: &str,
    filters: &[String],
) -> Result<Vec<Build>> {
    let patterns = filters
        .iter()
        .map(|filter| FieldPattern::parse(filter))
        .collect::<Result<Vec<_>, ConfigurationError>>()?;

    let builds = provider.builds(job).await?;
    Ok(matching_builds(&builds, &patterns)
        .into_iter()
        .cloned()
        .collect())
}

fn format_result(build: &Build) -> String {
    match (build.building, build.result()) {
        (true, _) => yellow("BUILDING"),
        (false, Some("SUCCESS")) => green("SUCCESS"),
        (false, Some(result)) => red(result),
        (false, None) => dim("-"),
    }
}

pub async fn builds(provider: &dyn BuildLogProvider, job: &str, filters: &[String]) -> Result<()> {
    let builds = find_matching_builds(provider, job, filters).await?;

    if builds.is_empty() {
        eprintln!("No builds found for job {}", bold(job));
        return Ok(());
    }

    for build in builds {
        let started = build
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{}  {}  {}  {}",
            bold(&format!("#{:<6}", build.number)),
            dim(&started),
            format_result(&build),
            build.full_display_name.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
