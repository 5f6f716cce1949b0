// src/render/rows.rs

use std::collections::HashSet;

use serde::Serialize;

use crate::config::model::FlowDefinition;
use crate::graph::{NodeId, Resolution};

/// How a node came out of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Ordered,
    /// Sits on a cycle.
    Cyclic,
    /// Not on a cycle, but downstream of one.
    Blocked,
}

/// One display row per node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub id: NodeId,
    pub label: String,
    pub job_id: Option<u64>,
    pub job_type: Option<String>,
    pub order: Option<usize>,
    pub stage: Option<usize>,
    pub dependencies: Vec<NodeId>,
    pub status: RowStatus,
}

/// Join resolver output with node metadata.
///
/// Ordered rows come first, by order. Unresolved rows follow in the order
/// the nodes appear in the document. A repeated node id yields one row.
pub fn project(definition: &FlowDefinition, resolution: &Resolution) -> Vec<NodeRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<NodeRow> = definition
        .dag()
        .nodes
        .iter()
        .filter(|spec| seen.insert(spec.id.as_str()))
        .map(|spec| {
            let order = resolution.order_of(&spec.id);
            let status = match (&order, &resolution.cycle) {
                (Some(_), _) => RowStatus::Ordered,
                (None, Some(cycle)) if cycle.is_cyclic(&spec.id) => RowStatus::Cyclic,
                (None, _) => RowStatus::Blocked,
            };
            NodeRow {
                id: spec.id.clone(),
                label: spec.label().to_string(),
                job_id: spec.job_id,
                job_type: spec.job_type.clone(),
                order,
                stage: resolution.stage_of(&spec.id),
                dependencies: resolution.dependencies_of(&spec.id).to_vec(),
                status,
            }
        })
        .collect();

    // Stable: unresolved rows keep document order.
    rows.sort_by_key(|row| (row.order.is_none(), row.order.unwrap_or(0)));
    rows
}
