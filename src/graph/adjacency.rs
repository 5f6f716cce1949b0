// src/graph/adjacency.rs

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::graph::model::{Edge, Node, NodeId};

/// Internal node structure: stores immediate deps and dependents by index.
#[derive(Debug, Clone)]
struct GraphNode {
    id: NodeId,
    /// Direct dependencies, one entry per known edge (repeats allowed).
    deps: Vec<usize>,
    /// Direct dependents, one entry per known edge (repeats allowed).
    dependents: Vec<usize>,
}

/// Index-based adjacency for one workflow graph.
///
/// Nodes keep the order in which the caller supplied them, and every
/// per-node list keeps edge-list order. Edges that mention an id outside the
/// node set are kept aside as *dangling* and take no part in adjacency.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<NodeId, usize>,
    dangling: Vec<Edge>,
}

impl FlowGraph {
    /// Build the adjacency view in a single pass over `nodes` then `edges`.
    ///
    /// Node ids are expected to be unique. If they are not, the first
    /// occurrence wins and later copies are skipped.
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut graph = FlowGraph::default();

        for node in nodes {
            if graph.index.contains_key(&node.id) {
                warn!(node = %node.id, "duplicate node id; keeping first occurrence");
                continue;
            }
            graph.index.insert(node.id.clone(), graph.nodes.len());
            graph.nodes.push(GraphNode {
                id: node.id.clone(),
                deps: Vec::new(),
                dependents: Vec::new(),
            });
        }

        for edge in edges {
            let source = graph.index.get(&edge.source).copied();
            let target = graph.index.get(&edge.target).copied();
            match (source, target) {
                (Some(s), Some(t)) => {
                    graph.nodes[s].dependents.push(t);
                    graph.nodes[t].deps.push(s);
                }
                _ => {
                    debug!(edge = %edge, "edge references unknown node; left out of adjacency");
                    graph.dangling.push(edge.clone());
                }
            }
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All node ids, in input order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Edges whose source or target is not a known node.
    pub fn dangling_edges(&self) -> &[Edge] {
        &self.dangling
    }

    /// Immediate dependencies of a node (sources of its incoming known edges).
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(&i) => self.unique_ids(&self.nodes[i].deps),
            None => Vec::new(),
        }
    }

    /// Immediate dependents of a node (targets of its outgoing known edges).
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(&i) => self.unique_ids(&self.nodes[i].dependents),
            None => Vec::new(),
        }
    }

    /// Nodes with no known dependencies.
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.deps.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Nodes with no known dependents.
    pub fn leaves(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.dependents.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Every node reachable by following dependents from `id`, breadth-first.
    ///
    /// These are the nodes that a failure of `id` would hold back. The start
    /// node itself is not included, even when it sits on a cycle.
    pub fn downstream_of(&self, id: &str) -> Vec<NodeId> {
        self.walk(id, |n| &n.dependents)
    }

    /// Every node reachable by following dependencies from `id`, breadth-first.
    pub fn upstream_of(&self, id: &str) -> Vec<NodeId> {
        self.walk(id, |n| &n.deps)
    }

    pub(crate) fn id_at(&self, i: usize) -> &str {
        &self.nodes[i].id
    }

    pub(crate) fn in_degree(&self, i: usize) -> usize {
        self.nodes[i].deps.len()
    }

    pub(crate) fn predecessors(&self, i: usize) -> &[usize] {
        &self.nodes[i].deps
    }

    pub(crate) fn successors(&self, i: usize) -> &[usize] {
        &self.nodes[i].dependents
    }

    fn walk<F>(&self, id: &str, next: F) -> Vec<NodeId>
    where
        F: Fn(&GraphNode) -> &Vec<usize>,
    {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };

        let mut seen: HashSet<usize> = HashSet::from([start]);
        let mut queue: VecDeque<usize> = VecDeque::from([start]);
        let mut out = Vec::new();

        while let Some(i) = queue.pop_front() {
            for &n in next(&self.nodes[i]) {
                if seen.insert(n) {
                    out.push(self.nodes[n].id.clone());
                    queue.push_back(n);
                }
            }
        }

        out
    }

    fn unique_ids(&self, indices: &[usize]) -> Vec<&str> {
        let mut seen = HashSet::new();
        indices
            .iter()
            .filter(|&&i| seen.insert(i))
            .map(|&i| self.nodes[i].id.as_str())
            .collect()
    }
}
