//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "board-deploy")]
#[command(about = "Find the board a source file targets and prepare it for download")]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// Scan serial ports and classify them against a source file's target
    Scan {
        /// Source file declaring the target board
        source: PathBuf,
        /// Print the resulting state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rewrite the target directive of a source file
    Retarget {
        /// Source file to rewrite in place
        source: PathBuf,
        /// Board name to declare
        #[arg(short, long)]
        target: String,
    },
    /// Write the default configuration
    Config {
        /// Destination (defaults to the user config directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
