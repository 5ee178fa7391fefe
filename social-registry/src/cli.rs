use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive in-memory client registry", long_about = None)]
pub struct Cli {
    /// JSON file of clients to load before the prompt opens.
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Number of actions HISTORY shows when no limit is given.
    #[arg(long, default_value_t = 10)]
    pub history_limit: usize,
}
