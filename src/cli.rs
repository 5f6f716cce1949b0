// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `flowdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flowdag",
    version,
    about = "Resolve execution order and dependencies of a workflow DAG.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the flow document (`.json`, otherwise TOML).
    ///
    /// Default: `flow.json` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "flow.json")]
    pub flow: String,

    /// Output format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "table")]
    pub format: OutputFormat,

    /// Reject graphs with unknown references, duplicate ids, self-loops or
    /// cycles instead of rendering them.
    #[arg(long)]
    pub strict: bool,

    /// Include the batch plan (stages split by `max_parallel`).
    #[arg(long)]
    pub plan: bool,

    /// Keep running and re-render whenever the flow document is saved.
    #[arg(long)]
    pub watch: bool,

    /// Quiet period after a change before re-rendering, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 200)]
    pub debounce_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLOWDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Output format as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
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
