// src/render/mod.rs

//! Presentation layer: joins resolver output with the flow document's
//! display metadata and turns it into text or JSON.
//!
//! Nothing here changes ordering; it only projects a [`Resolution`] onto
//! rows an editor or terminal can show, with unresolved nodes marked.
//!
//! [`Resolution`]: crate::graph::Resolution

pub mod report;
pub mod rows;
pub mod table;

pub use report::FlowReport;
pub use rows::{project, NodeRow, RowStatus};
pub use table::render_table;

use crate::cli::OutputFormat;
use crate::errors::Result;

/// Pretty-printed JSON form of a report.
pub fn render_json(report: &FlowReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render a report in the requested format.
pub fn render(report: &FlowReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => render_json(report),
    }
}
