// src/logging.rs

//! Logging setup for `flowdag` using `tracing` + `tracing-subscriber`.
//!
//! Where the filter comes from, first match wins:
//! 1. `--log-level` on the command line
//! 2. `FLOWDAG_LOG`, either a bare level ("debug", "warning") or full
//!    filter directives ("info,flowdag::graph=trace")
//! 3. `info`
//!
//! Logs go to STDERR; stdout carries only the rendered report.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "FLOWDAG_LOG";

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = log_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

/// Resolve the effective filter from the CLI flag and the `FLOWDAG_LOG` value.
///
/// An unparseable environment value falls back to `info` rather than
/// failing startup.
pub fn log_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::default().add_directive(level_filter(lvl).into());
    }

    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => match parse_level_str(value) {
            Some(level) => EnvFilter::default().add_directive(LevelFilter::from_level(level).into()),
            None => EnvFilter::try_new(value)
                .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into())),
        },
        None => EnvFilter::default().add_directive(LevelFilter::INFO.into()),
    }
}

fn level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Lenient level names: case-insensitive, surrounding whitespace ignored,
/// `warning` accepted for `warn`.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
