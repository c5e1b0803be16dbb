use std::{
    env,
    path::{Path, PathBuf},
};

use clap::Parser;
use eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::Cli,
    project_config::{read_project_config, ProjectConfig},
    user_config::get_config_path,
};

pub fn setup() -> Result<(Cli, PathBuf, ProjectConfig)> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }

    setup_env()?;
    let (config_path, project_config) = setup_configs(&cli)?;

    Ok((cli, config_path, project_config))
}

fn setup_env() -> Result<()> {
    color_eyre::install()?;

    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }

    tracing_subscriber::fmt()
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    Ok(())
}

fn setup_configs(cli: &Cli) -> Result<(PathBuf, ProjectConfig)> {
    let config_path = get_config_path(cli.config.as_deref())
        .ok_or_else(|| eyre::eyre!("Could not find config path"))?;
    let project_path = get_project_path()?;
    let project_config = read_project_config(&project_path)?;
    info!(?config_path, ?project_config, "got configs");
    Ok((config_path, project_config))
}

fn get_project_path() -> Result<PathBuf> {
    env::var("BDIFF_PROJECT_PATH")
        .or_else(|_| env::current_dir().map(|p| p.to_string_lossy().to_string()))
        .map(|p| Path::new(&p).to_path_buf())
        .map_err(|e| eyre::eyre!("Error getting project path: {}", e))
}
