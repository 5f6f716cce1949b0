// src/graph/mod.rs

//! Workflow graph representation and ordering.
//!
//! - [`model`] holds the plain node / edge input types.
//! - [`adjacency`] builds an index-based adjacency view from those inputs.
//! - [`resolver`] computes the topological order, dependency sets and
//!   cycle report for one graph.
//! - [`plan`] groups an ordering into bounded batches for preview.
//! - [`validate`] is the opt-in strict checker for callers that want to
//!   reject malformed graphs before resolving them.

pub mod adjacency;
pub mod model;
pub mod plan;
pub mod resolver;
pub mod validate;

pub use adjacency::FlowGraph;
pub use model::{Edge, Node, NodeId};
pub use plan::{plan_batches, Batch};
pub use resolver::{resolve, CycleError, Resolution};
pub use validate::{ensure_valid, validate_graph, GraphIssue};
