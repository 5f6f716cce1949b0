// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::watch::session::SessionEvent;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch a single flow document and send [`SessionEvent::FileChanged`] for
/// every event that touches it.
///
/// The parent directory is watched rather than the file itself, because
/// many editors save by writing a temporary file and renaming it over the
/// original.
pub fn spawn_file_watcher(
    path: impl AsRef<Path>,
    session_tx: mpsc::Sender<SessionEvent>,
) -> Result<WatcherHandle> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| anyhow!("flow path {:?} has no file name", path))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("flowdag: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("flowdag: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    info!(file = ?path, "watching flow document for changes");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            let touches_flow = event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(file_name.as_os_str()));
            if !touches_flow {
                continue;
            }

            debug!(kind = ?event.kind, "flow document changed");
            if let Err(err) = session_tx.send(SessionEvent::FileChanged).await {
                warn!("failed to send SessionEvent::FileChanged: {err}");
                // Session is gone; nothing left to notify.
                return;
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}
