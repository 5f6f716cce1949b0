// src/graph/plan.rs

use serde::Serialize;

use crate::graph::model::NodeId;
use crate::graph::resolver::Resolution;

/// A group of nodes that the backend could dispatch together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    /// 1-based position of the batch in the plan.
    pub index: usize,
    /// Stage all members share.
    pub stage: usize,
    pub nodes: Vec<NodeId>,
}

/// Split each stage of a resolution into batches of at most `max_parallel`.
///
/// Members keep their resolved order. Nodes without an order never appear.
/// A `max_parallel` of 0 is treated as 1.
pub fn plan_batches(resolution: &Resolution, max_parallel: usize) -> Vec<Batch> {
    let width = max_parallel.max(1);
    let mut by_stage: Vec<Vec<NodeId>> = vec![Vec::new(); resolution.stage_count()];

    for id in &resolution.sequence {
        if let Some(stage) = resolution.stage_of(id) {
            by_stage[stage - 1].push(id.clone());
        }
    }

    let mut batches = Vec::new();
    for (s, members) in by_stage.into_iter().enumerate() {
        for chunk in members.chunks(width) {
            batches.push(Batch {
                index: batches.len() + 1,
                stage: s + 1,
                nodes: chunk.to_vec(),
            });
        }
    }

    batches
}
