use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use futures::{Future, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use tracing::info;

use crate::spinner::{make_download_spinner, make_spinner_style};

use super::{parse_builds, Build, BuildLogProvider, ProviderError, WhoAmI, BUILD_TREE};

#[derive(thiserror::Error, Debug)]
pub enum JenkinsApiError {
    /// An error from reqwest when making an HTTP request.
    #[error("Error making HTTP request: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// An error response from the server with the given status code and body.
    #[error("Server returned {0}: {1}")]
    ErrorResponse(StatusCode, String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

pub struct JenkinsClient {
    client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
    progress: MultiProgress,
}

const USER_AGENT: &str = "builddiff";

/// Path of a job, including the folders it is nested in: `a/b` becomes `job/a/job/b`.
pub fn job_path(job: &str) -> String {
    job.split('/')
        .filter(|part| !part.is_empty())
        .map(|part| format!("job/{}", part))
        .collect::<Vec<_>>()
        .join("/")
}

impl JenkinsClient {
    pub fn new(url: &str, user: &str, password: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| eyre::eyre!("Failed to build client: {}", e))?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
            progress: MultiProgress::new(),
        })
    }

    pub fn builds_url(&self, job: &str) -> String {
        format!("{}/{}/api/json", self.base_url, job_path(job))
    }

    pub fn console_text_url(&self, job: &str, number: u64) -> String {
        format!("{}/{}/{}/consoleText", self.base_url, job_path(job), number)
    }

    async fn run_with_spinner<F, T>(
        &self,
        message: Cow<'static, str>,
        future: F,
    ) -> Result<T, JenkinsApiError>
    where
        F: Future<Output = Result<T, JenkinsApiError>>,
    {
        let pb = self.progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(make_spinner_style());
        pb.set_message(message);
        let result = future.await;
        pb.finish_and_clear();

        result
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, JenkinsApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JenkinsApiError::ErrorResponse(status, body));
        }
        Ok(response)
    }

    pub async fn get_builds(&self, job: &str) -> Result<Vec<Build>, JenkinsApiError> {
        info!(?job, "Getting builds");
        let tree = format!("builds[{}]", BUILD_TREE.join(","));
        let body = self
            .get(
                &self.builds_url(job),
                &[("depth", "1".to_string()), ("tree", tree)],
            )
            .await?
            .text()
            .await?;
        let builds = parse_builds(job, &body)?;
        info!(count = builds.len(), "Got builds");
        Ok(builds)
    }

    pub async fn get_console_text(
        &self,
        job: &str,
        number: u64,
        progress_bar: &ProgressBar,
    ) -> Result<bytes::Bytes, JenkinsApiError> {
        info!(?job, number, "Getting console text");

        let mut got_first_chunk = false;
        let response = self.get(&self.console_text_url(job, number), &[]).await?;
        let content_length = response.content_length().unwrap_or(0);
        progress_bar.set_length(content_length);
        let mut result = bytes::BytesMut::with_capacity(content_length as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            // Start showing bytes in the progress bar only after first chunk is received
            if !got_first_chunk {
                progress_bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.yellow} {msg} {bytes:.dim}")
                        .unwrap(),
                );
            }

            got_first_chunk = true;
            let chunk = chunk?;
            progress_bar.inc(chunk.len() as u64);
            result.extend_from_slice(&chunk);
        }
        progress_bar.finish_and_clear();
        Ok(result.freeze())
    }

    pub async fn get_current_user(&self) -> Result<WhoAmI, JenkinsApiError> {
        info!("Getting current user");
        let url = format!("{}/whoAmI/api/json", self.base_url);
        let future = async {
            let body = self.get(&url, &[]).await?.text().await?;
            Ok::<_, JenkinsApiError>(serde_json::from_str::<WhoAmI>(&body)?)
        };
        let current_user = self
            .run_with_spinner("Checking login...".into(), future)
            .await?;

        info!(?current_user, "Got current user");
        Ok(current_user)
    }
}

#[async_trait]
impl BuildLogProvider for JenkinsClient {
    fn server(&self) -> &str {
        &self.base_url
    }

    async fn builds(&self, job: &str) -> Result<Vec<Build>, ProviderError> {
        let builds = self
            .run_with_spinner(
                format!("Fetching builds of {}...", job).into(),
                self.get_builds(job),
            )
            .await?;
        Ok(builds)
    }

    async fn fetch_console_text(&self, job: &str, number: u64) -> Result<String, ProviderError> {
        let pb = self.progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(make_download_spinner());
        pb.set_message(format!("Fetching console output of #{}...", number));

        let bytes = self
            .get_console_text(job, number, &pb)
            .await
            .map_err(|err| match err {
                JenkinsApiError::ErrorResponse(StatusCode::NOT_FOUND, _) => {
                    ProviderError::NotFound {
                        job: job.to_string(),
                        number,
                    }
                }
                err => ProviderError::Transport(err),
            });
        pb.finish_and_clear();

        Ok(String::from_utf8_lossy(&bytes?).into_owned())
    }
}
