use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::{fs, path::Path};

pub const PROJECT_CONFIG_FILE: &str = ".bdiff.toml";

/// Per-project settings read from `.bdiff.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    pub job: Option<JobConfig>,
}

/// How to find the job and how to group its console output. Every field can be overridden from
/// the command line.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct JobConfig {
    pub name: Option<String>,
    pub pattern: Option<String>,
    pub flags: Option<String>,
    pub key_group: Option<String>,
    pub value_group: Option<String>,
}

pub fn read_project_config_from_path(config_path: &Path) -> Result<ProjectConfig> {
    let config_str = fs::read_to_string(config_path).wrap_err_with(|| {
        format!(
            "Error reading config from path {}",
            config_path.to_string_lossy()
        )
    })?;
    let config: ProjectConfig = toml::from_str(&config_str)?;
    Ok(config)
}

/// Read `.bdiff.toml` from `project_path`. A project without one gets the default config.
pub fn read_project_config(project_path: &Path) -> Result<ProjectConfig> {
    let config_path = project_path.join(PROJECT_CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(ProjectConfig::default());
    }
    read_project_config_from_path(&config_path)
}
