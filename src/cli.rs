use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cliptui")]
#[command(about = "A terminal clipboard history manager", long_about = None)]
pub struct Cli {
    /// Directory holding config.json and clipboard_history.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the recorded history
    Show {
        /// Only show items containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Write the history to a JSON file
    Export { path: PathBuf },
    /// Replace the history with the contents of a JSON file
    Import { path: PathBuf },
    /// Delete all recorded items
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
