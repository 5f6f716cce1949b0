// src/watch/mod.rs

//! Edit-session support for `--watch`.
//!
//! This module is responsible for:
//! - Wiring up a filesystem watcher (`notify`) on the flow document.
//! - Content hashing so a save that changes nothing is not re-rendered.
//! - The session loop that debounces bursts of saves and re-resolves.
//!
//! It does **not** know how a graph is ordered; each refresh goes through
//! the same [`crate::analyze`] path as a one-shot run.

pub mod hash;
pub mod session;
pub mod watcher;

pub use hash::content_hash;
pub use session::{EditSession, SessionEvent, SessionOptions, SessionStats};
pub use watcher::{spawn_file_watcher, WatcherHandle};
