use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bdiff")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
#[command(color = clap::ColorChoice::Never)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print verbose output
    #[arg(global = true)]
    #[clap(long, short)]
    pub verbose: bool,

    /// Jenkins job; defaults to job.name in .bdiff.toml
    #[arg(global = true)]
    #[clap(long, short)]
    pub job: Option<String>,

    /// Path to the user configuration file [default: ~/.bdiff]
    #[arg(global = true)]
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Always fetch console output from the server
    #[arg(global = true)]
    #[clap(long)]
    pub no_cache: bool,
}

/// How console output is grouped; falls back to the [job] section of .bdiff.toml.
#[derive(Args, Debug, Clone, Default)]
pub struct PatternArgs {
    /// Regex with two named groups, one for the key and one for the values
    #[clap(long, short)]
    pub pattern: Option<String>,

    /// Regex flags: i (ignore case), m (multi-line), s (dot matches newline), x (verbose), U (swap greed)
    #[clap(long)]
    pub flags: Option<String>,

    /// Name of the group to use as key [default: key]
    #[clap(long)]
    pub key_group: Option<String>,

    /// Name of the group to use as values [default: values]
    #[clap(long)]
    pub value_group: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List grouped failures of a build
    List {
        /// Build number
        build: u64,

        #[command(flatten)]
        pattern: PatternArgs,
    },

    /// Compare grouped failures of two builds
    Diff {
        /// Build number of A
        #[arg(value_name = "A")]
        build_a: u64,

        /// Build number of B
        #[arg(value_name = "B")]
        build_b: u64,

        #[command(flatten)]
        pattern: PatternArgs,

        /// Do not colorize the output
        #[clap(long)]
        no_color: bool,
    },

    /// List builds of the job
    Builds {
        /// Only show builds where FIELD matches REGEX, e.g. result=FAILURE
        #[clap(long = "filter", short, value_name = "FIELD=REGEX")]
        filters: Vec<String>,
    },

    /// Store Jenkins url, user and password
    Login {
        /// Read the password or API token from stdin
        #[clap(long)]
        with_token: bool,
    },

    /// Remove the stored Jenkins password
    Logout {},
}
