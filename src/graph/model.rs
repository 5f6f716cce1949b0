// src/graph/model.rs

use serde::{Deserialize, Serialize};

/// Identifier of a node, unique within one graph.
pub type NodeId = String;

/// A workflow node as seen by the resolver.
///
/// `payload` is an opaque display reference (typically a job id). It is
/// carried through untouched and never influences ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            payload: None,
        }
    }

    pub fn with_payload(id: impl Into<NodeId>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: Some(payload.into()),
        }
    }
}

/// Directed dependency edge: `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
