//! Command-line interface for vocards
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Turn vocabulary lists into voiced Anki cards
#[derive(Parser, Debug)]
#[command(
    name = "vocards",
    version,
    about = "Turn vocabulary lists into voiced Anki cards"
)]
pub struct Cli {
    /// Subcommand to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Vocabulary file, one `word - meaning` per line
    #[arg(long, global = true, value_name = "PATH")]
    pub vocab: Option<PathBuf>,

    /// Target Anki deck
    #[arg(long, global = true, value_name = "NAME")]
    pub deck: Option<String>,

    /// Workers per stage
    #[arg(long, short = 'j', global = true, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Directory the mp3 files are written to
    #[arg(long, global = true, value_name = "PATH")]
    pub audio_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create cards for every line of the vocabulary file
    Run,

    /// Print the parsed vocabulary without calling any service
    Parse,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        log_filter(self.quiet, self.verbose)
    }
}

/// Maps `-q` / `-v` flags to a tracing filter directive.
pub fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}
