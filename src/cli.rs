use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "StepManiaX tournament standings")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Run every gauntlet and ladder of an event folder
    Event {
        /// Folder holding event.yaml
        folder: PathBuf,
        /// Also write each sheet as CSV into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a single gauntlet
    Gauntlet {
        /// Gauntlet config file (.yaml or .json)
        config: PathBuf,
        /// Entrant list file
        #[arg(short, long, default_value = "entrants.yaml")]
        entrants: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a single ladder
    Ladder {
        /// Ladder config file (.yaml or .json)
        config: PathBuf,
        /// Entrant list file
        #[arg(short, long, default_value = "entrants.yaml")]
        entrants: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Refresh the cached song/chart catalog
    Catalog {
        /// Show the songs and charts matching this title
        #[arg(short, long)]
        find: Option<String>,
        /// Drop the cached catalog and fetch everything again
        #[arg(long)]
        rebuild: bool,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}
