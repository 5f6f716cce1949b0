// src/render/report.rs

use serde::Serialize;

use crate::config::model::{ErrorStrategy, FlowDefinition, FlowStatus};
use crate::graph::{plan_batches, Batch, Edge, GraphIssue, NodeId, Resolution};
use crate::render::rows::{project, NodeRow, RowStatus};

/// Everything the CLI shows for one flow, in a serializable bundle.
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub flow: String,
    pub status: FlowStatus,
    pub error_strategy: ErrorStrategy,
    pub max_parallel: usize,
    pub rows: Vec<NodeRow>,
    pub cycles: Vec<Vec<NodeId>>,
    pub dangling: Vec<Edge>,
    /// Strict validation findings; empty unless validation was requested.
    pub issues: Vec<GraphIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<Batch>>,
}

impl FlowReport {
    pub fn build(
        definition: &FlowDefinition,
        resolution: &Resolution,
        issues: Vec<GraphIssue>,
        include_plan: bool,
    ) -> Self {
        let dag = definition.dag();
        let batches = include_plan.then(|| plan_batches(resolution, dag.max_parallel));

        Self {
            flow: definition.name().to_string(),
            status: definition.status(),
            error_strategy: dag.error_strategy,
            max_parallel: dag.max_parallel,
            rows: project(definition, resolution),
            cycles: resolution
                .cycle
                .as_ref()
                .map(|c| c.cycles.clone())
                .unwrap_or_default(),
            dangling: resolution.dangling.clone(),
            issues,
            batches,
        }
    }

    /// Rows that did not get an order.
    pub fn unresolved(&self) -> impl Iterator<Item = &NodeRow> {
        self.rows.iter().filter(|r| r.status != RowStatus::Ordered)
    }

    pub fn has_unresolved(&self) -> bool {
        self.unresolved().next().is_some()
    }
}
