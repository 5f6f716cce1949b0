// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod render;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::FlowDefinition;
use crate::errors::FlowdagError;
use crate::graph::{resolve, validate_graph};
use crate::render::{render, FlowReport};
use crate::watch::{spawn_file_watcher, EditSession, SessionEvent, SessionOptions};

/// What to compute beyond the resolution itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Run strict validation and attach its issues to the report.
    pub validate: bool,
    /// Attach the batch plan.
    pub plan: bool,
}

/// Resolve a flow definition and bundle the result for display.
///
/// This is the single path both one-shot runs and edit sessions go through.
pub fn analyze(definition: &FlowDefinition, options: &ReportOptions) -> FlowReport {
    let (nodes, edges) = definition.graph_input();
    let resolution = resolve(&nodes, &edges);
    let issues = if options.validate {
        validate_graph(&nodes, &edges)
    } else {
        Vec::new()
    };

    FlowReport::build(definition, &resolution, issues, options.plan)
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - flow document loading
/// - resolution + rendering
/// - (optional) strict validation
/// - (optional) file watcher + edit session
/// - Ctrl-C handling in watch mode
pub async fn run(args: CliArgs) -> Result<()> {
    let flow_path = PathBuf::from(&args.flow);
    let report_options = ReportOptions {
        validate: args.strict,
        plan: args.plan,
    };

    if args.watch {
        return run_watch(flow_path, &args, report_options).await;
    }

    let definition = load_and_validate(&flow_path)?;
    let report = analyze(&definition, &report_options);
    println!("{}", render(&report, args.format)?);

    if args.strict && !report.issues.is_empty() {
        return Err(FlowdagError::InvalidGraph(report.issues).into());
    }
    if report.has_unresolved() {
        warn!(flow = %report.flow, "flow has nodes that cannot be ordered");
    }

    debug!("one-shot run complete");
    Ok(())
}

async fn run_watch(flow_path: PathBuf, args: &CliArgs, report: ReportOptions) -> Result<()> {
    let (tx, rx) = mpsc::channel::<SessionEvent>(64);

    let _watcher_handle = spawn_file_watcher(&flow_path, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(SessionEvent::ShutdownRequested).await;
        });
    }

    let options = SessionOptions {
        format: args.format,
        report,
        debounce: Duration::from_millis(args.debounce_ms),
    };

    info!(file = ?flow_path, "starting edit session");
    let stats = EditSession::new(flow_path, options, rx).run().await?;
    debug!(?stats, "edit session finished");
    Ok(())
}
