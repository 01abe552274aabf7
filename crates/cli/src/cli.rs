//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Multisend - concurrent multi-destination file distribution
#[derive(Parser, Debug)]
#[command(
    name = "multisend",
    author,
    version,
    about = "Distribute one file to many destinations concurrently",
    long_about = "Distributes a single local file to multiple independent remote \n\
                  destinations (cloud storage, source control, FTP, email) \n\
                  concurrently, and reports per-destination success or failure \n\
                  after all attempts complete."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MULTISEND_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MULTISEND_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Distribute a file to the configured destinations
    Send(SendArgs),

    /// Validate an upload plan without sending anything
    Validate(ValidateArgs),

    /// List the destinations an upload plan defines
    Destinations(DestinationsArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// File to distribute
    pub file: PathBuf,

    /// Path to the upload plan (TOML or JSON)
    #[arg(short, long, default_value = "plan.toml", env = "MULTISEND_PLAN")]
    pub config: PathBuf,

    /// Name the file carries at each destination (defaults to the file
    /// stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Target only this destination id (repeatable; default is all)
    #[arg(short = 'd', long = "dest", value_name = "ID")]
    pub dest: Vec<String>,

    /// Recipient address for notification destinations (repeatable)
    #[arg(short = 'r', long = "recipient", value_name = "ADDR")]
    pub recipient: Vec<String>,

    /// Report output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the upload plan to validate
    #[arg(short, long, default_value = "plan.toml")]
    pub config: PathBuf,

    /// Emit the validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `destinations` command
#[derive(Parser, Debug)]
pub struct DestinationsArgs {
    /// Path to the upload plan to inspect
    #[arg(short, long, default_value = "plan.toml")]
    pub config: PathBuf,

    /// Emit the roster as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per destination
    Text,
    /// Serialized CompletionReport
    Json,
}
