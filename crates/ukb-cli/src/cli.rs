//! CLI argument definitions for the decoder.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ukb-decode",
    version,
    about = "Rename coded UDI column headers and decode categorical cell values",
    long_about = "Rename cryptic UDI column headers (e.g. `31-0.0`) into readable\n\
                  semantic names using a columns documentation page, and decode\n\
                  categorically-coded cell values via remotely resolved\n\
                  data-codings with local caching."
)]
pub struct Cli {
    /// Path to the columns documentation HTML page.
    #[arg(short = 'H', long = "dictionary", value_name = "HTML")]
    pub dictionary: PathBuf,

    /// Input delimited table (dialect auto-detected).
    #[arg(short = 'i', long = "input", value_name = "TABLE")]
    pub input: PathBuf,

    /// Output table path, written in the input's dialect.
    #[arg(short = 'o', long = "output", value_name = "TABLE")]
    pub output: PathBuf,

    /// Coding-map cache file, read at startup and written at the end.
    #[arg(long = "cache", value_name = "JSON")]
    pub cache: Option<PathBuf>,

    /// Instance-description file (field -> instance -> text).
    #[arg(long = "instance-map", value_name = "JSON")]
    pub instance_map: Option<PathBuf>,

    /// Naming style for base names.
    #[arg(long = "style", value_enum, default_value = "snake")]
    pub style: NamingStyleArg,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI naming-style choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum NamingStyleArg {
    Snake,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
