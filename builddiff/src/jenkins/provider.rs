use async_trait::async_trait;

use super::{Build, JenkinsApiError};

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// The job has no build with this number.
    #[error("Build #{number} of job {job} not found")]
    NotFound { job: String, number: u64 },

    /// The build server could not be reached or refused the request.
    #[error("Failed to reach build server: {0}")]
    Transport(#[from] JenkinsApiError),
}

/// Source of builds and their console output.
#[async_trait]
pub trait BuildLogProvider: Sync + Send {
    /// Identifies the server, used to namespace cached console output.
    fn server(&self) -> &str;

    async fn builds(&self, job: &str) -> Result<Vec<Build>, ProviderError>;

    async fn fetch_console_text(&self, job: &str, number: u64) -> Result<String, ProviderError>;
}

/// Look up each of `numbers` in the job's build list, failing on the first one that is missing.
pub async fn find_builds(
    provider: &dyn BuildLogProvider,
    job: &str,
    numbers: &[u64],
) -> Result<Vec<Build>, ProviderError> {
    let builds = provider.builds(job).await?;
    numbers
        .iter()
        .map(|&number| {
            builds
                .iter()
                .find(|build| build.number == number)
                .cloned()
                .ok_or_else(|| ProviderError::NotFound {
                    job: job.to_string(),
                    number,
                })
        })
        .collect()
}
