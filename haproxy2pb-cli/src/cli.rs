//! CLI argument parsing using clap derive API
//!
//! Purely declarative, no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use haproxy2pb_core::config::Framing;

/// haproxy2pb -- convert HAProxy HTTP access logs to protobuf records.
///
/// Use `haproxy2pb <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "haproxy2pb", version, about, long_about = None)]
pub struct Cli {
    /// Path to the haproxy2pb.toml configuration file.
    #[arg(short, long, default_value = "haproxy2pb.toml", global = true)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Record framing on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// Varint length prefix before every record.
    LengthDelimited,
    /// Bare concatenated messages.
    Raw,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::LengthDelimited => Framing::LengthDelimited,
            FramingArg::Raw => Framing::Raw,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan access log lines and write protobuf records.
    Encode(EncodeArgs),

    /// Report encoded size against line size for every line.
    Stats(StatsArgs),

    /// Scan lines and print the decoded records.
    Inspect(InspectArgs),

    /// Read a length-delimited record stream and print the records.
    Decode(DecodeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- encode ----

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Input log file ("-" or omitted: config input.path, then stdin).
    pub input: Option<PathBuf>,

    /// Output file (omitted: config output.path, then stdout).
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Override record framing.
    #[arg(long)]
    pub framing: Option<FramingArg>,

    /// Abort on the first line that does not match the log format.
    #[arg(long)]
    pub stop_on_error: bool,
}

// ---- stats ----

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Input log file ("-" or omitted: config input.path, then stdin).
    pub input: Option<PathBuf>,
}

// ---- inspect ----

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Log lines to scan. Reads the input when none are given.
    pub lines: Vec<String>,

    /// Input log file used when no lines are given.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

// ---- decode ----

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Length-delimited record file ("-" or omitted: stdin).
    pub input: Option<PathBuf>,
}

// ---- config ----

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, input, output, scanner).
        #[arg(long)]
        section: Option<String>,
    },
}
