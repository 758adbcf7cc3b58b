use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::config::DEFAULT_CONFIG_FILE;

#[derive(Debug, Parser)]
#[command(
    name = "jobguard",
    version,
    about = "Flags likely job scams on job-board pages using a local analysis server"
)]
pub struct Cli {
    /// RON configuration file; a missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Base URL of the analysis server.
    #[arg(long, global = true, env = "JOBGUARD_SERVER")]
    pub server: Option<String>,

    /// Use the older `/check_job` endpoint.
    #[arg(long, global = true)]
    pub legacy_api: bool,

    /// Upper bound on characters sent for analysis.
    #[arg(long, global = true)]
    pub max_chars: Option<usize>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Saved HTML file or http(s) URL.
    pub source: String,

    /// Page URL to assume when the source is a saved file.
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a page and analyze it if it is a job posting.
    Page(SourceArgs),
    /// List the job cards on a search results page.
    Cards {
        #[command(flatten)]
        page: SourceArgs,

        /// Analyze the card with this 1-based index.
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Analyze pasted job text (read from stdin without --text).
    Manual {
        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },
    /// Show classification and extraction without contacting the server.
    Inspect(SourceArgs),
    /// Print the effective configuration.
    Config,
}
