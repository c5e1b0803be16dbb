use builddiff::{
    cli::{self, Commands},
    commands::{
        self, auth, diff_command, make_cache, make_client, resolve_job, Grouping,
    },
    setup::setup,
    term::exit_with_error,
};
use clap::Parser;
use eyre::Result;

async fn run() -> Result<()> {
    let (cli, config_path, project_config) = setup()?;
    let job_config = project_config.job.as_ref();
    let cache = make_cache(cli.no_cache);

    match &cli.command {
        Some(Commands::List { build, pattern }) => {
            let grouping = Grouping::resolve(pattern, job_config)?;
            let job = resolve_job(cli.job.as_deref(), job_config)?;
            let client = make_client(&config_path).await?;
            commands::list(&client, cache.as_ref(), &job, *build, &grouping).await
        }
        Some(Commands::Diff {
            build_a,
            build_b,
            pattern,
            no_color,
        }) => {
            let grouping = Grouping::resolve(pattern, job_config)?;
            let job = resolve_job(cli.job.as_deref(), job_config)?;
            let client = make_client(&config_path).await?;
            diff_command(
                &client,
                cache.as_ref(),
                &job,
                *build_a,
                *build_b,
                &grouping,
                !*no_color,
            )
            .await
        }
        Some(Commands::Builds { filters }) => {
            let job = resolve_job(cli.job.as_deref(), job_config)?;
            let client = make_client(&config_path).await?;
            commands::builds(&client, &job, filters).await
        }
        Some(Commands::Login { with_token }) => auth::login(&config_path, *with_token).await,
        Some(Commands::Logout {}) => auth::logout(&config_path),
        None => {
            // Show help if no command is given. arg_required_else_help clap thing is supposed to
            // do this but that doesn't work if some arguments, but no command, are given
            cli::Cli::parse_from(["bdiff", "--help"]);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let _ = exit_with_error::<eyre::Error>(e);
    }
}
