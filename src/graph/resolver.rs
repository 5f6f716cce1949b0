// src/graph/resolver.rs

//! Topological ordering of a workflow graph.
//!
//! [`resolve`] is a pure function: it builds a fresh [`FlowGraph`] from the
//! caller's nodes and edges, runs Kahn's algorithm with a FIFO queue seeded
//! in input order, and returns a [`Resolution`]. A graph that cannot be fully
//! ordered is not an error at this level; the nodes that were left over are
//! reported in [`Resolution::cycle`] so an editor can keep rendering.

use std::collections::{BTreeMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::adjacency::FlowGraph;
use crate::graph::model::{Edge, Node, NodeId};

/// Nodes that could not be given an order.
///
/// `unresolved` lists every such node in input order. `cycles` narrows that
/// down to the strongly connected groups that actually loop; whatever is in
/// `unresolved` but in no cycle is merely blocked behind one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error, Serialize)]
#[error("{} node(s) could not be ordered: {}", .unresolved.len(), .unresolved.join(", "))]
pub struct CycleError {
    pub unresolved: Vec<NodeId>,
    pub cycles: Vec<Vec<NodeId>>,
}

impl CycleError {
    pub fn contains(&self, id: &str) -> bool {
        self.unresolved.iter().any(|n| n == id)
    }

    /// True if `id` sits on a cycle (as opposed to being blocked by one).
    pub fn is_cyclic(&self, id: &str) -> bool {
        self.cycles.iter().flatten().any(|n| n == id)
    }

    /// Unresolved nodes that are downstream of a cycle without being on one.
    pub fn blocked(&self) -> Vec<&str> {
        self.unresolved
            .iter()
            .filter(|id| !self.is_cyclic(id))
            .map(|id| id.as_str())
            .collect()
    }
}

/// Result of resolving one graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Resolution {
    /// 1-based execution position of every orderable node.
    pub order: BTreeMap<NodeId, usize>,
    /// The orderable nodes listed by position.
    pub sequence: Vec<NodeId>,
    /// Direct dependencies of every node, deduplicated, in edge-list order.
    pub dependencies: BTreeMap<NodeId, Vec<NodeId>>,
    /// Wave of each ordered node: roots are 1, everything else is one past
    /// its deepest dependency.
    pub stages: BTreeMap<NodeId, usize>,
    /// Edges with an endpoint outside the node set.
    pub dangling: Vec<Edge>,
    pub cycle: Option<CycleError>,
}

impl Resolution {
    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.order.get(id).copied()
    }

    pub fn stage_of(&self, id: &str) -> Option<usize> {
        self.stages.get(id).copied()
    }

    pub fn dependencies_of(&self, id: &str) -> &[NodeId] {
        self.dependencies
            .get(id)
            .map(|d| d.as_slice())
            .unwrap_or(&[])
    }

    /// True when every node received an order.
    pub fn is_complete(&self) -> bool {
        self.cycle.is_none()
    }

    /// Number of stages in the ordered part of the graph.
    pub fn stage_count(&self) -> usize {
        self.stages.values().copied().max().unwrap_or(0)
    }

    /// Strict view: fail with the cycle report if anything is unresolved.
    pub fn into_result(self) -> Result<Resolution, CycleError> {
        match self.cycle {
            Some(cycle) => Err(cycle),
            None => Ok(self),
        }
    }
}

/// Compute order, dependencies and cycle report for a graph.
///
/// Edges with an unknown endpoint are ignored for ordering and listed in
/// [`Resolution::dangling`]. Duplicate node ids are a caller error; the first
/// occurrence is used.
pub fn resolve(nodes: &[Node], edges: &[Edge]) -> Resolution {
    let graph = FlowGraph::build(nodes, edges);
    let n = graph.len();

    let mut in_degree: Vec<usize> = (0..n).map(|i| graph.in_degree(i)).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut stage = vec![0usize; n];
    let mut sequence = Vec::with_capacity(n);

    while let Some(i) = queue.pop_front() {
        // Every predecessor has been popped already, so its stage is final.
        stage[i] = 1 + graph
            .predecessors(i)
            .iter()
            .map(|&p| stage[p])
            .max()
            .unwrap_or(0);
        sequence.push(i);

        for &succ in graph.successors(i) {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    let mut resolution = Resolution {
        dependencies: collect_dependencies(&graph, edges),
        dangling: graph.dangling_edges().to_vec(),
        ..Resolution::default()
    };

    for (pos, &i) in sequence.iter().enumerate() {
        let id = graph.id_at(i).to_string();
        resolution.order.insert(id.clone(), pos + 1);
        resolution.stages.insert(id.clone(), stage[i]);
        resolution.sequence.push(id);
    }

    if sequence.len() < n {
        let ordered: HashSet<usize> = sequence.iter().copied().collect();
        let unresolved: Vec<usize> = (0..n).filter(|i| !ordered.contains(i)).collect();
        let cycle = cycle_report(&graph, &unresolved);
        warn!(
            unresolved = cycle.unresolved.len(),
            cycles = cycle.cycles.len(),
            "graph contains cycles; some nodes were left unordered"
        );
        resolution.cycle = Some(cycle);
    }

    debug!(
        nodes = n,
        edges = edges.len(),
        ordered = resolution.sequence.len(),
        dangling = resolution.dangling.len(),
        "resolved workflow graph"
    );

    resolution
}

/// Dependencies are read straight off the edge list, independent of ordering.
///
/// Every known node gets an entry. Sources are kept even when they are not
/// known nodes, so the editor can show what the user typed.
fn collect_dependencies(graph: &FlowGraph, edges: &[Edge]) -> BTreeMap<NodeId, Vec<NodeId>> {
    let mut deps: BTreeMap<NodeId, Vec<NodeId>> = graph
        .node_ids()
        .map(|id| (id.to_string(), Vec::new()))
        .collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for edge in edges {
        if !seen.insert((edge.target.as_str(), edge.source.as_str())) {
            continue;
        }
        if let Some(list) = deps.get_mut(&edge.target) {
            list.push(edge.source.clone());
        }
    }

    deps
}

/// Break the unresolved remainder into real cycles and blocked nodes.
fn cycle_report(graph: &FlowGraph, unresolved: &[usize]) -> CycleError {
    let members: HashSet<usize> = unresolved.iter().copied().collect();
    let mut sub: DiGraphMap<usize, ()> = DiGraphMap::new();

    for &i in unresolved {
        sub.add_node(i);
    }
    for &i in unresolved {
        for &succ in graph.successors(i) {
            if members.contains(&succ) {
                sub.add_edge(i, succ, ());
            }
        }
    }

    let mut components: Vec<Vec<usize>> = tarjan_scc(&sub)
        .into_iter()
        .filter(|c| c.len() > 1 || sub.contains_edge(c[0], c[0]))
        .map(|mut c| {
            c.sort_unstable();
            c
        })
        .collect();
    components.sort_by_key(|c| c[0]);

    let ids = |indices: &[usize]| -> Vec<NodeId> {
        indices.iter().map(|&i| graph.id_at(i).to_string()).collect()
    };

    CycleError {
        unresolved: ids(unresolved),
        cycles: components.iter().map(|c| ids(c)).collect(),
    }
}
