// src/config/mod.rs

//! Flow definition documents.
//!
//! Responsibilities:
//! - Define the serde-backed document model (`model.rs`).
//! - Load a document from disk as JSON or TOML (`loader.rs`).
//! - Validate document-level invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_flow_path, load_and_validate, load_from_path, parse_str, DocumentFormat};
pub use model::{
    DagConfig, EdgeSpec, ErrorStrategy, FlowDefinition, FlowStatus, NodeCondition, NodeSpec,
    RawFlowDefinition,
};
