// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::parse_duration;

/// Command-line arguments for `runguard`.
///
/// Every flag overrides the matching field of the `--config` job file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runguard",
    version,
    about = "Run a command with a timeout and retries, and append an audit log entry.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a TOML job file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Per-attempt time limit (e.g. "10s", "500ms"). "0s" disables it.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Force-kill the command if it survives this long after the timeout's
    /// SIGTERM.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub kill_after: Option<Duration>,

    /// Maximum number of retries after the first attempt.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Exit status that triggers a retry. Repeat for several.
    #[arg(long = "retry-on", value_name = "CODE", allow_negative_numbers = true)]
    pub retry_on: Vec<i32>,

    /// Pause after every attempt (e.g. "3s").
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub delay: Option<Duration>,

    /// Directory for the execution log. Without it no log entry is written.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Execution log file name inside `--log-dir`.
    #[arg(long, value_name = "NAME")]
    pub log_file: Option<String>,

    /// Action label recorded in the execution log.
    #[arg(long, value_name = "TEXT")]
    pub action: Option<String>,

    /// Server/host label recorded in the execution log.
    #[arg(long, value_name = "TEXT")]
    pub server: Option<String>,

    /// Username recorded in the execution log (default: $USER).
    #[arg(long, value_name = "TEXT")]
    pub username: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNGUARD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the job, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command and arguments, after `--`.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
