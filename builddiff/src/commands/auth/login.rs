use std::path::Path;

use eyre::{eyre, Result};
use reqwest::StatusCode;
use tracing::info;

use crate::{
    jenkins::{JenkinsApiError, JenkinsClient, WhoAmI},
    term::{bold, prompt, prompt_secret, read_stdin},
    token_store,
    user_config::{read_user_config, write_user_config, JenkinsConfig, UserConfig},
};

pub async fn login(config_path: &Path, use_stdin_token: bool) -> Result<()> {
    let existing = read_user_config(config_path)?;

    if let Some(config) = &existing {
        if let Some(current_user) = validate_existing_password(&config.jenkins).await? {
            println!(
                "Already logged in to {} as {}",
                bold(&config.jenkins.url),
                bold(&current_user.name)
            );
            println!("To log out, run {}", bold("bdiff logout"));
            return Ok(());
        }
    }

    let config = setup_user_config(config_path, existing.as_ref(), use_stdin_token).await?;
    println!(
        "Logged in to {} as {}",
        bold(&config.jenkins.url),
        bold(&config.jenkins.user)
    );
    Ok(())
}

/// Ask for the Jenkins url, user and password, check them against the server and save them. The
/// password goes to the keyring, the rest to the config file.
pub async fn setup_user_config(
    config_path: &Path,
    existing: Option<&UserConfig>,
    use_stdin_token: bool,
) -> Result<UserConfig> {
    let defaults = existing.map(|config| &config.jenkins);
    let url = prompt(
        "Jenkins url (e.g.: http://build.mydomain.com)",
        defaults.map(|jenkins| jenkins.url.as_str()),
    )?;
    let user = prompt("User name", defaults.map(|jenkins| jenkins.user.as_str()))?;
    let password = if use_stdin_token {
        read_stdin()?
    } else {
        prompt_secret("Password or API token")?
    };

    let jenkins = JenkinsConfig {
        url: url.trim_end_matches('/').to_string(),
        user,
        password: None,
    };
    let hostname = jenkins.hostname()?;

    let client = JenkinsClient::new(&jenkins.url, &jenkins.user, &password)?;
    check_credentials(&client, &jenkins.user).await?;

    token_store::set_password(&hostname, &jenkins.user, &password)
        .map_err(|e| eyre!(e).wrap_err("Failed to store password"))?;

    let config = UserConfig { jenkins };
    write_user_config(config_path, &config)?;
    println!("Config saved to {}", config_path.to_string_lossy());
    Ok(config)
}

async fn check_credentials(client: &JenkinsClient, user: &str) -> Result<WhoAmI> {
    match client.get_current_user().await {
        Ok(current_user) if current_user.authenticated && !current_user.anonymous => {
            Ok(current_user)
        }
        Ok(_) | Err(JenkinsApiError::ErrorResponse(StatusCode::UNAUTHORIZED, _)) => {
            Err(eyre!("Jenkins did not accept the password of {}", bold(user)))
        }
        Err(err) => Err(eyre!(err).wrap_err("Failed to check credentials")),
    }
}

async fn validate_existing_password(jenkins: &JenkinsConfig) -> Result<Option<WhoAmI>> {
    let hostname = jenkins.hostname()?;
    let password = match &jenkins.password {
        Some(password) => password.clone(),
        None => match token_store::get_password(&hostname, &jenkins.user) {
            Ok(password) => password,
            Err(keyring::Error::NoEntry) => {
                info!("No password stored, continuing");
                return Ok(None);
            }
            Err(err) => {
                return Err(eyre!(err).wrap_err("Failed to get password from keyring"));
            }
        },
    };

    let client = JenkinsClient::new(&jenkins.url, &jenkins.user, &password)?;
    match client.get_current_user().await {
        Ok(current_user) if current_user.authenticated && !current_user.anonymous => {
            Ok(Some(current_user))
        }
        Ok(_) | Err(JenkinsApiError::ErrorResponse(StatusCode::UNAUTHORIZED, _)) => {
            info!("Password is invalid, continuing");
            Ok(None)
        }
        Err(err) => Err(eyre!(err).wrap_err("Failed to get current user")),
    }
}
