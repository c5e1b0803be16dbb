use keyring::{error::Error, Entry};
use tracing::info;

const SERVICE: &str = "builddiff";

fn entry(hostname: &str, user: &str) -> Result<Entry, Error> {
    Entry::new(SERVICE, &format!("{}@{}", user, hostname))
}

pub fn set_password(hostname: &str, user: &str, password: &str) -> Result<(), Error> {
    info!(?hostname, ?user, "Storing password");
    entry(hostname, user)?.set_password(password)
}

pub fn get_password(hostname: &str, user: &str) -> Result<String, Error> {
    let password = entry(hostname, user)?.get_password()?;
    info!(?hostname, ?user, "Got password from keyring");
    Ok(password)
}

pub fn delete_password(hostname: &str, user: &str) -> Result<(), Error> {
    info!(?hostname, ?user, "Deleting password");
    entry(hostname, user)?.delete_password()
}
