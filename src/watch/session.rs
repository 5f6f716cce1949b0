// src/watch/session.rs

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cli::OutputFormat;
use crate::config::loader::{parse_str, DocumentFormat};
use crate::config::model::FlowDefinition;
use crate::render::render;
use crate::watch::hash::content_hash;
use crate::{analyze, ReportOptions};

/// Events sent into the session from the watcher or the signal handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    FileChanged,
    ShutdownRequested,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Times the document was re-read: once on entry, then once per burst.
    pub refreshes: usize,
    /// Refreshes that produced output (content changed and loaded).
    pub renders: usize,
}

/// Options that shape each refresh.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub format: OutputFormat,
    pub report: ReportOptions,
    /// Quiet period that must pass without further changes before a refresh.
    pub debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            report: ReportOptions::default(),
            debounce: Duration::from_millis(200),
        }
    }
}

/// Re-resolves a flow document every time it is saved.
///
/// Each refresh reads the file, skips it if the content hash is unchanged,
/// and otherwise loads, resolves and renders it from scratch. Nothing is
/// carried over between refreshes except the last hash. A document that
/// fails to load is logged and the session keeps waiting for the next save.
pub struct EditSession {
    path: PathBuf,
    options: SessionOptions,
    events_rx: mpsc::Receiver<SessionEvent>,
    last_hash: Option<String>,
    stats: SessionStats,
}

impl EditSession {
    pub fn new(
        path: impl Into<PathBuf>,
        options: SessionOptions,
        events_rx: mpsc::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            path: path.into(),
            options,
            events_rx,
            last_hash: None,
            stats: SessionStats::default(),
        }
    }

    /// Main event loop.
    ///
    /// Renders once on entry, then once per debounced burst of changes,
    /// until shutdown is requested or every sender is dropped.
    pub async fn run(mut self) -> Result<SessionStats> {
        info!(file = ?self.path, "edit session started");
        self.refresh_and_print();

        while let Some(event) = self.events_rx.recv().await {
            match event {
                SessionEvent::FileChanged => {
                    if !self.debounce().await {
                        break;
                    }
                    self.refresh_and_print();
                }
                SessionEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping edit session");
                    break;
                }
            }
        }

        info!(
            refreshes = self.stats.refreshes,
            renders = self.stats.renders,
            "edit session exiting"
        );
        Ok(self.stats)
    }

    /// Re-read the document and render it if its content changed.
    ///
    /// Returns `Ok(None)` when the content hash matches the previous refresh.
    pub fn refresh(&mut self) -> Result<Option<String>> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("reading flow document at {:?}", self.path))?;
        let hash = content_hash(&bytes);

        if self.last_hash.as_deref() == Some(hash.as_str()) {
            debug!(file = ?self.path, "document content unchanged; skipping refresh");
            return Ok(None);
        }
        self.last_hash = Some(hash);

        let contents = String::from_utf8_lossy(&bytes);
        let raw = parse_str(&contents, DocumentFormat::from_path(&self.path))?;
        let definition = FlowDefinition::try_from(raw)?;
        let report = analyze(&definition, &self.options.report);

        if report.has_unresolved() {
            warn!(flow = %report.flow, "flow has nodes that cannot be ordered");
        }

        Ok(Some(render(&report, self.options.format)?))
    }

    fn refresh_and_print(&mut self) {
        self.stats.refreshes += 1;
        match self.refresh() {
            Ok(Some(output)) => {
                self.stats.renders += 1;
                println!("{output}");
            }
            Ok(None) => {}
            Err(err) => warn!(file = ?self.path, error = %err, "could not refresh flow document"),
        }
    }

    /// Wait until `debounce` passes with no further change events.
    ///
    /// Returns `false` if shutdown arrived (or the channel closed) meanwhile.
    async fn debounce(&mut self) -> bool {
        let window = self.options.debounce;
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => return true,
                event = self.events_rx.recv() => match event {
                    Some(SessionEvent::FileChanged) => {
                        deadline.as_mut().reset(Instant::now() + window);
                    }
                    Some(SessionEvent::ShutdownRequested) | None => return false,
                },
            }
        }
    }
}
