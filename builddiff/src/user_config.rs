use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Per-user settings, stored as YAML in `~/.bdiff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub jenkins: JenkinsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JenkinsConfig {
    pub url: String,
    pub user: String,
    /// Plain text password; the keyring is used when this is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl JenkinsConfig {
    pub fn hostname(&self) -> Result<String> {
        let url = reqwest::Url::parse(&self.url)
            .wrap_err_with(|| format!("Invalid Jenkins url {}", self.url))?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| eyre::eyre!("Jenkins url {} has no host", self.url))
    }
}

/// Config path from the command line, then `BDIFF_CONFIG`, then `~/.bdiff`.
pub fn get_config_path(from_cli: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = from_cli {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env::var_os("BDIFF_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".bdiff"))
}

/// Read the user config, or `None` when the file does not exist yet.
pub fn read_user_config(config_path: &Path) -> Result<Option<UserConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_str = fs::read_to_string(config_path).wrap_err_with(|| {
        format!(
            "Error reading config from path {}",
            config_path.to_string_lossy()
        )
    })?;
    let config: UserConfig = serde_yaml::from_str(&config_str).wrap_err_with(|| {
        format!(
            "Error parsing config from path {}",
            config_path.to_string_lossy()
        )
    })?;
    Ok(Some(config))
}

pub fn write_user_config(config_path: &Path, config: &UserConfig) -> Result<()> {
    let config_str = serde_yaml::to_string(config)?;
    fs::write(config_path, config_str).wrap_err_with(|| {
        format!(
            "Error writing config to path {}",
            config_path.to_string_lossy()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_read_user_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".bdiff");
        fs::write(
            &path,
            "jenkins:\n  url: http://build.mydomain.com\n  user: alice\n  password: hunter2\n",
        )
        .unwrap();

        let config = read_user_config(&path).unwrap().unwrap();

        assert_eq!(
            config,
            UserConfig {
                jenkins: JenkinsConfig {
                    url: "http://build.mydomain.com".to_string(),
                    user: "alice".to_string(),
                    password: Some("hunter2".to_string()),
                }
            }
        );
        assert_eq!(config.jenkins.hostname().unwrap(), "build.mydomain.com");
    }

    #[test]
    fn test_missing_user_config_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_user_config(&dir.path().join(".bdiff")).unwrap(), None);
    }

    #[test]
    fn test_write_then_read_user_config_without_password() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".bdiff");
        let config = UserConfig {
            jenkins: JenkinsConfig {
                url: "https://ci.example.com".to_string(),
                user: "bob".to_string(),
                password: None,
            },
        };

        write_user_config(&path, &config).unwrap();

        assert!(!fs::read_to_string(&path).unwrap().contains("password"));
        assert_eq!(read_user_config(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_invalid_user_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".bdiff");
        fs::write(&path, "jenkins: [").unwrap();
        assert!(read_user_config(&path).is_err());
    }

    #[test]
    fn test_cli_config_path_wins() {
        let path = Path::new("/tmp/custom.yml");
        assert_eq!(get_config_path(Some(path)), Some(path.to_path_buf()));
    }
}
