use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

/// Build an arXiv corpus for a research subject, then ask questions about it.
#[derive(Debug, Default, Parser)]
#[command(name = "litsearch", version)]
pub struct Cli {
    /// Research subject to build a corpus for. Prompted for when omitted.
    pub subject: Option<String>,

    /// Skip the corpus build and chat over the existing corpus.
    #[arg(long, conflicts_with = "subject")]
    pub chat: bool,

    /// RON config file. Defaults to ./litsearch.ron when that file exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Delay between job status polls.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    #[arg(long, value_enum, value_name = "DEST")]
    pub log_destination: Option<LogDestination>,

    /// trace, debug, info, warn, error or off.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}
