// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{FlowDefinition, RawFlowDefinition};
use crate::errors::{FlowdagError, Result};

/// Serialization format of a flow document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

/// Deserialize a flow document without semantic validation.
pub fn parse_str(contents: &str, format: DocumentFormat) -> Result<RawFlowDefinition> {
    let raw: RawFlowDefinition = match format {
        DocumentFormat::Json => serde_json::from_str(contents)?,
        DocumentFormat::Toml => toml::from_str(contents)?,
    };
    Ok(raw)
}

/// Load a flow document from a given path and return the raw `RawFlowDefinition`.
///
/// This only performs deserialization; use [`load_and_validate`] for the
/// document-level checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFlowDefinition> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    let contents = fs::read_to_string(path).map_err(|source| FlowdagError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = ?path, ?format, "parsing flow document");
    parse_str(&contents, format)
}

/// Load a flow document from path and run document-level validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads JSON or TOML (by extension).
/// - Applies defaults (handled by `serde`).
/// - Checks name, `max_parallel`, `cron_expr` and node cross-references.
///
/// The graph itself is left as the user wrote it, cycles and dangling edges
/// included.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FlowDefinition> {
    let raw = load_from_path(&path)?;
    let definition = FlowDefinition::try_from(raw)?;
    Ok(definition)
}

/// Flow document used when `--flow` is not given.
pub fn default_flow_path() -> PathBuf {
    PathBuf::from("flow.json")
}
