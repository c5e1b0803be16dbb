use std::path::Path;

use eyre::Result;

use crate::{term::bold, token_store, user_config::read_user_config};

pub fn logout(config_path: &Path) -> Result<()> {
    let config = read_user_config(config_path)?
        .ok_or_else(|| eyre::eyre!("Not logged in; no config at {}", config_path.display()))?;
    let jenkins = &config.jenkins;
    let hostname = jenkins.hostname()?;

    match token_store::delete_password(&hostname, &jenkins.user) {
        Ok(()) => println!("Logged out of {} account", bold(&hostname)),
        Err(keyring::Error::NoEntry) => {
            println!("No password stored for {} on {}", jenkins.user, bold(&hostname))
        }
        Err(err) => return Err(eyre::eyre!(err).wrap_err("Failed to delete password")),
    }

    if jenkins.password.is_some() {
        eprintln!(
            "A password is still set in {}; remove it to log out completely",
            config_path.display()
        );
    }
    Ok(())
}
