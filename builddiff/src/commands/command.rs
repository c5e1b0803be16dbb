use std::path::Path;

use eyre::{Result, WrapErr};
use regex::Regex;
use tracing::info;

use crate::{
    cache::{Cache, CacheKey},
    cli::PatternArgs,
    commands::auth,
    error::ConfigurationError,
    group::{compile_pattern, group_by_regex, validate_groups, GroupedFailures},
    jenkins::{Build, BuildLogProvider, JenkinsClient},
    project_config::JobConfig,
    term::bold,
    token_store,
    user_config::{read_user_config, JenkinsConfig},
};

pub const DEFAULT_PATTERN: &str = r"^(?P<key>\S+)[ \t]+(?P<values>\S+)$";
pub const DEFAULT_FLAGS: &str = "m";
pub const DEFAULT_KEY_GROUP: &str = "key";
pub const DEFAULT_VALUE_GROUP: &str = "values";

/// A compiled pattern together with the names of its key and value groups.
#[derive(Debug, Clone)]
pub struct Grouping {
    pub regex: Regex,
    pub key_group: String,
    pub value_group: String,
}

impl Grouping {
    pub fn new(
        regex: Regex,
        key_group: &str,
        value_group: &str,
    ) -> Result<Self, ConfigurationError> {
        validate_groups(&regex, key_group, value_group)?;
        Ok(Self {
            regex,
            key_group: key_group.to_string(),
            value_group: value_group.to_string(),
        })
    }

    /// Command line arguments win over the job config, which wins over the defaults. The
    /// pattern's groups are checked here so a bad pattern fails before anything is fetched.
    pub fn resolve(
        args: &PatternArgs,
        job_config: Option<&JobConfig>,
    ) -> Result<Self, ConfigurationError> {
        let config = job_config.cloned().unwrap_or_default();

        let (pattern, flags) = match (args.pattern.as_deref(), config.pattern.as_deref()) {
            // Flags from the config belong to the config's pattern
            (Some(pattern), _) => (pattern, args.flags.as_deref()),
            (None, Some(pattern)) => (
                pattern,
                args.flags.as_deref().or(config.flags.as_deref()),
            ),
            (None, None) => (
                DEFAULT_PATTERN,
                args.flags.as_deref().or(Some(DEFAULT_FLAGS)),
            ),
        };
        let key_group = args
            .key_group
            .as_deref()
            .or(config.key_group.as_deref())
            .unwrap_or(DEFAULT_KEY_GROUP);
        let value_group = args
            .value_group
            .as_deref()
            .or(config.value_group.as_deref())
            .unwrap_or(DEFAULT_VALUE_GROUP);

        info!(?pattern, ?flags, ?key_group, ?value_group, "resolved pattern");
        Self::new(compile_pattern(pattern, flags)?, key_group, value_group)
    }

    pub fn apply(&self, text: &str) -> Result<GroupedFailures, ConfigurationError> {
        group_by_regex(text, &self.regex, &self.key_group, &self.value_group)
    }
}

pub fn resolve_job(
    from_cli: Option<&str>,
    job_config: Option<&JobConfig>,
) -> Result<String, ConfigurationError> {
    from_cli
        .or(job_config.and_then(|c| c.name.as_deref()))
        .map(str::to_string)
        .ok_or(ConfigurationError::MissingJob)
}

/// Console output of a build, served from the cache when possible. Output of builds that are
/// still running is never cached.
pub async fn fetch_console_text(
    provider: &dyn BuildLogProvider,
    cache: Option<&Cache>,
    build: &Build,
) -> Result<String> {
    match cache {
        Some(cache) if !build.building => {
            let key = CacheKey::console_text(provider.server(), &build.job, build.number);
            cache
                .memoize(&key, || async {
                    let text = provider
                        .fetch_console_text(&build.job, build.number)
                        .await?;
                    Ok::<_, eyre::Report>(text)
                })
                .await
        }
        _ => Ok(provider
            .fetch_console_text(&build.job, build.number)
            .await?),
    }
}

pub fn make_cache(no_cache: bool) -> Option<Cache> {
    if no_cache {
        return None;
    }
    match Cache::default_location() {
        Ok(cache) => Some(cache),
        Err(e) => {
            info!("Not using cache: {}", e);
            None
        }
    }
}

/// Build a client from the user config, asking for the config first if there is none yet.
pub async fn make_client(config_path: &Path) -> Result<JenkinsClient> {
    let user_config = match read_user_config(config_path)? {
        Some(config) => config,
        None => {
            println!("Setting up Jenkins config");
            auth::setup_user_config(config_path, None, false).await?
        }
    };
    let jenkins = &user_config.jenkins;
    let password = get_password(jenkins)?;
    JenkinsClient::new(&jenkins.url, &jenkins.user, &password)
}

fn get_password(jenkins: &JenkinsConfig) -> Result<String> {
    if let Ok(password) = std::env::var("BDIFF_PASSWORD") {
        return Ok(password);
    }
    if let Some(password) = &jenkins.password {
        return Ok(password.clone());
    }

    let hostname = jenkins.hostname()?;
    token_store::get_password(&hostname, &jenkins.user)
        .map_err(|err| match err {
            keyring::Error::NoEntry => {
                eyre::eyre!(
                    "No password found for {}. Have you logged in? Run {}",
                    bold(&hostname),
                    bold("bdiff login")
                )
            }
            err => eyre::eyre!("Failed to get password for {}: {}", hostname, err),
        })
        .wrap_err("Could not authenticate with Jenkins")
}
