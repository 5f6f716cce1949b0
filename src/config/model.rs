// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::{Edge, Node};

/// Flow definition as read from a JSON or TOML document, before validation.
///
/// This is the shape the backend stores for a workflow:
///
/// ```json
/// {
///   "name": "nightly-etl",
///   "cron_expr": "0 2 * * *",
///   "dag_config": {
///     "nodes": [{"id": "extract", "job_id": 1}, {"id": "load", "job_id": 2}],
///     "edges": [{"source": "extract", "target": "load"}],
///     "max_parallel": 5
///   }
/// }
/// ```
///
/// `nodes` and `edges` are both required, even when empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawFlowDefinition {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: FlowStatus,

    /// Standard 5-field cron expression, if the flow is scheduled.
    #[serde(default)]
    pub cron_expr: Option<String>,

    pub dag_config: DagConfig,
}

/// Whether the backend will schedule the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Enabled,
    Disabled,
}

/// What the backend does with the rest of a run when a node fails.
///
/// Only displayed here; nothing in this crate executes nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    /// Skip everything still pending.
    #[default]
    FailFast,
    /// Keep running independent nodes.
    Continue,
    /// Skip only the failed node's downstream nodes.
    SkipDownstream,
}

impl fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorStrategy::FailFast => "fail_fast",
            ErrorStrategy::Continue => "continue",
            ErrorStrategy::SkipDownstream => "skip_downstream",
        };
        f.write_str(s)
    }
}

/// The `dag_config` object: the graph itself plus run settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DagConfig {
    pub nodes: Vec<NodeSpec>,

    pub edges: Vec<EdgeSpec>,

    #[serde(default)]
    pub error_strategy: ErrorStrategy,

    /// Upper bound on nodes the backend dispatches at once.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_max_parallel() -> usize {
    5
}

/// One node of the workflow editor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeSpec {
    pub id: String,

    /// Job this node runs. Nodes without a job are virtual (start/end).
    #[serde(default)]
    pub job_id: Option<u64>,

    /// Display name; the id is shown when absent.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub job_type: Option<String>,

    /// Node-level parameters merged over the flow's input at run time.
    #[serde(default)]
    pub params: Map<String, Value>,

    #[serde(default)]
    pub condition: Option<NodeCondition>,

    /// Upstream node id -> parameter name its result is passed in as.
    #[serde(default)]
    pub upstream_results: BTreeMap<String, String>,

    #[serde(default)]
    pub position_x: i64,

    #[serde(default)]
    pub position_y: i64,
}

impl NodeSpec {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn is_virtual(&self) -> bool {
        self.job_id.is_none()
    }

    /// Other nodes this node's settings mention (condition and upstream results).
    pub fn referenced_nodes(&self) -> impl Iterator<Item = &str> {
        self.condition
            .as_ref()
            .and_then(NodeCondition::referenced_node)
            .into_iter()
            .chain(self.upstream_results.keys().map(|k| k.as_str()))
    }

    pub fn to_node(&self) -> Node {
        Node {
            id: self.id.clone(),
            payload: self.job_id.map(|j| j.to_string()),
        }
    }
}

/// Gate on whether a node runs, evaluated by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeCondition {
    Always,
    NodeSuccess { node_id: String },
    NodeFailed { node_id: String },
    Expression { value: String },
}

impl NodeCondition {
    pub fn referenced_node(&self) -> Option<&str> {
        match self {
            NodeCondition::NodeSuccess { node_id } | NodeCondition::NodeFailed { node_id } => {
                Some(node_id.as_str())
            }
            NodeCondition::Always | NodeCondition::Expression { .. } => None,
        }
    }
}

/// `{source, target}`: target waits for source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
}

impl From<&EdgeSpec> for Edge {
    fn from(spec: &EdgeSpec) -> Self {
        Edge::new(spec.source.clone(), spec.target.clone())
    }
}

/// A flow definition that passed document-level validation.
///
/// Graph-level problems (unknown edge endpoints, cycles, duplicate ids) are
/// still allowed at this point; see [`crate::graph::validate`].
#[derive(Debug, Clone, Serialize)]
pub struct FlowDefinition {
    name: String,
    description: Option<String>,
    status: FlowStatus,
    cron_expr: Option<String>,
    dag: DagConfig,
}

impl FlowDefinition {
    pub(crate) fn new_unchecked(raw: RawFlowDefinition) -> Self {
        Self {
            name: raw.name,
            description: raw.description,
            status: raw.status,
            cron_expr: raw.cron_expr,
            dag: raw.dag_config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> FlowStatus {
        self.status
    }

    pub fn cron_expr(&self) -> Option<&str> {
        self.cron_expr.as_deref()
    }

    pub fn dag(&self) -> &DagConfig {
        &self.dag
    }

    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.dag.nodes.iter().find(|n| n.id == id)
    }

    /// Project the document onto the resolver's input types.
    pub fn graph_input(&self) -> (Vec<Node>, Vec<Edge>) {
        let nodes = self.dag.nodes.iter().map(NodeSpec::to_node).collect();
        let edges = self.dag.edges.iter().map(Edge::from).collect();
        (nodes, edges)
    }
}
