// src/graph/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::errors::{FlowdagError, Result};
use crate::graph::model::{Edge, Node, NodeId};
use crate::graph::resolver::resolve;

/// A problem found by strict validation.
///
/// The resolver tolerates all of these; callers that want a hard boundary
/// run [`validate_graph`] or [`ensure_valid`] first.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphIssue {
    #[error("node at position {position} has an empty id")]
    EmptyNodeId { position: usize },

    #[error("node id '{id}' is used more than once")]
    DuplicateNodeId { id: NodeId },

    #[error("edge '{edge}' references unknown node '{missing}'")]
    UnknownReference { edge: Edge, missing: NodeId },

    #[error("node '{id}' depends on itself")]
    SelfLoop { id: NodeId },

    #[error("cycle detected involving nodes [{}]", .nodes.join(", "))]
    Cycle { nodes: Vec<NodeId> },
}

/// Collect every structural issue in a graph.
///
/// This checks:
/// - node ids are non-empty and unique
/// - every edge endpoint names a known node
/// - no node depends on itself
/// - the known edges form no cycle
pub fn validate_graph(nodes: &[Node], edges: &[Edge]) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    let known = check_node_ids(nodes, &mut issues);
    check_edges(edges, &known, &mut issues);
    check_cycles(nodes, edges, &known, &mut issues);

    debug!(issues = issues.len(), "strict graph validation finished");
    issues
}

/// Fail with [`FlowdagError::InvalidGraph`] if [`validate_graph`] finds anything.
pub fn ensure_valid(nodes: &[Node], edges: &[Edge]) -> Result<()> {
    let issues = validate_graph(nodes, edges);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(FlowdagError::InvalidGraph(issues))
    }
}

fn check_node_ids<'a>(nodes: &'a [Node], issues: &mut Vec<GraphIssue>) -> HashSet<&'a str> {
    let mut known = HashSet::new();
    let mut reported = HashSet::new();

    for (position, node) in nodes.iter().enumerate() {
        if node.id.trim().is_empty() {
            issues.push(GraphIssue::EmptyNodeId { position });
            continue;
        }
        if !known.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
            issues.push(GraphIssue::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
    }

    known
}

fn check_edges(edges: &[Edge], known: &HashSet<&str>, issues: &mut Vec<GraphIssue>) {
    let mut self_loops = HashSet::new();

    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !known.contains(endpoint.as_str()) {
                issues.push(GraphIssue::UnknownReference {
                    edge: edge.clone(),
                    missing: endpoint.clone(),
                });
                break;
            }
        }
        if edge.source == edge.target
            && known.contains(edge.source.as_str())
            && self_loops.insert(edge.source.as_str())
        {
            issues.push(GraphIssue::SelfLoop {
                id: edge.source.clone(),
            });
        }
    }
}

fn check_cycles(nodes: &[Node], edges: &[Edge], known: &HashSet<&str>, issues: &mut Vec<GraphIssue>) {
    // Edge direction: source -> target, skipping self-loops which are
    // reported on their own.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for node in nodes {
        if known.contains(node.id.as_str()) {
            graph.add_node(node.id.as_str());
        }
    }
    for edge in edges {
        let (s, t) = (edge.source.as_str(), edge.target.as_str());
        if s != t && known.contains(s) && known.contains(t) {
            graph.add_edge(s, t, ());
        }
    }

    if toposort(&graph, None).is_ok() {
        return;
    }

    // toposort only names one node; list every member of every cycle.
    let proper: Vec<Edge> = edges.iter().filter(|e| e.source != e.target).cloned().collect();
    if let Some(cycle) = resolve(nodes, &proper).cycle {
        for members in cycle.cycles {
            issues.push(GraphIssue::Cycle { nodes: members });
        }
    }
}
