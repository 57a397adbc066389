//! CLI module for lotc
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{DownloadArgs, MergeArgs, TrimArgs};

/// lotc - download, trim and merge videos from the terminal
///
/// Timestamps are given as START-END pairs such as `0:30-0:45` or
/// `1:02:03.5-1:02:10`. Every output is written as `.mp4`.
#[derive(Parser, Debug)]
#[command(name = "lotc")]
#[command(about = "Download, trim and merge videos")]
#[command(version)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true, env = "LOTC_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (pretty or json)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: String,

    /// Configuration file (default: ./lotc.toml, then the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// Override a configuration key, e.g. `--set descriptor=cut`
    #[arg(long, global = true, value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a video, optionally keeping only the given ranges
    Download(args::DownloadArgs),
    /// Cut ranges out of a local video and join them
    Trim(args::TrimArgs),
    /// Join whole videos in the given order
    Merge(args::MergeArgs),
}
