#![allow(dead_code)]

use std::collections::BTreeMap;

use flowdag::config::{
    DagConfig, EdgeSpec, ErrorStrategy, FlowDefinition, FlowStatus, NodeCondition, NodeSpec,
    RawFlowDefinition,
};
use flowdag::graph::{Edge, Node};
use serde_json::{Map, Value};

/// Builder for plain resolver input.
///
/// ```ignore
/// let (nodes, edges) = GraphBuilder::new().nodes(["A", "B"]).edge("A", "B").build();
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: &str) -> Self {
        self.nodes.push(Node::new(id));
        self
    }

    pub fn nodes<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.nodes.extend(ids.into_iter().map(Node::new));
        self
    }

    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    /// Add `a -> b -> c -> ...` for consecutive ids.
    pub fn chain<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let ids: Vec<&str> = ids.into_iter().collect();
        for pair in ids.windows(2) {
            self.edges.push(Edge::new(pair[0], pair[1]));
        }
        self
    }

    pub fn build(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

/// Builder for `FlowDefinition` to simplify test setup.
pub struct FlowDefinitionBuilder {
    raw: RawFlowDefinition,
}

impl FlowDefinitionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            raw: RawFlowDefinition {
                name: name.to_string(),
                description: None,
                status: FlowStatus::Enabled,
                cron_expr: None,
                dag_config: DagConfig {
                    nodes: Vec::new(),
                    edges: Vec::new(),
                    error_strategy: ErrorStrategy::FailFast,
                    max_parallel: 5,
                },
            },
        }
    }

    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.raw.dag_config.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, source: &str, target: &str) -> Self {
        self.raw.dag_config.edges.push(EdgeSpec {
            source: source.to_string(),
            target: target.to_string(),
        });
        self
    }

    pub fn max_parallel(mut self, n: usize) -> Self {
        self.raw.dag_config.max_parallel = n;
        self
    }

    pub fn error_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.raw.dag_config.error_strategy = strategy;
        self
    }

    pub fn cron_expr(mut self, expr: &str) -> Self {
        self.raw.cron_expr = Some(expr.to_string());
        self
    }

    pub fn raw(self) -> RawFlowDefinition {
        self.raw
    }

    pub fn build(self) -> FlowDefinition {
        FlowDefinition::try_from(self.raw).expect("Failed to build valid flow from builder")
    }
}

/// Builder for `NodeSpec`.
pub struct NodeSpecBuilder {
    node: NodeSpec,
}

impl NodeSpecBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            node: NodeSpec {
                id: id.to_string(),
                job_id: None,
                name: None,
                job_type: None,
                params: Map::new(),
                condition: None,
                upstream_results: BTreeMap::new(),
                position_x: 0,
                position_y: 0,
            },
        }
    }

    pub fn job(mut self, job_id: u64) -> Self {
        self.node.job_id = Some(job_id);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.node.name = Some(name.to_string());
        self
    }

    pub fn job_type(mut self, job_type: &str) -> Self {
        self.node.job_type = Some(job_type.to_string());
        self
    }

    pub fn param(mut self, key: &str, value: Value) -> Self {
        self.node.params.insert(key.to_string(), value);
        self
    }

    pub fn condition(mut self, condition: NodeCondition) -> Self {
        self.node.condition = Some(condition);
        self
    }

    pub fn upstream_result(mut self, node_id: &str, param: &str) -> Self {
        self.node
            .upstream_results
            .insert(node_id.to_string(), param.to_string());
        self
    }

    pub fn build(self) -> NodeSpec {
        self.node
    }
}
