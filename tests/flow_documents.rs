use std::error::Error;
use std::io::Write;

use flowdag::config::{
    default_flow_path, load_and_validate, parse_str, DocumentFormat, ErrorStrategy, FlowDefinition, FlowStatus,
    NodeCondition,
};
use flowdag::errors::FlowdagError;
use flowdag::graph::resolve;
use tempfile::{Builder, NamedTempFile};

type TestResult = Result<(), Box<dyn Error>>;

fn json_file(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(".json").tempfile()?;
    write!(file, "{}", contents)?;
    Ok(file)
}

fn toml_file(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(".toml").tempfile()?;
    write!(file, "{}", contents)?;
    Ok(file)
}

#[test]
fn json_document_loads_with_defaults() -> TestResult {
    let file = json_file(
        r#"{
            "name": "nightly-etl",
            "cron_expr": "0 2 * * *",
            "dag_config": {
                "nodes": [
                    {"id": "extract", "job_id": 1, "name": "Extract orders"},
                    {"id": "load", "job_id": 2, "params": {"table": "orders"}}
                ],
                "edges": [{"source": "extract", "target": "load"}]
            }
        }"#,
    )?;

    let flow = load_and_validate(file.path())?;

    assert_eq!(flow.name(), "nightly-etl");
    assert_eq!(flow.status(), FlowStatus::Enabled);
    assert_eq!(flow.cron_expr(), Some("0 2 * * *"));
    assert_eq!(flow.dag().max_parallel, 5);
    assert_eq!(flow.dag().error_strategy, ErrorStrategy::FailFast);
    assert_eq!(flow.node("extract").map(|n| n.label()), Some("Extract orders"));
    assert_eq!(flow.node("load").map(|n| n.label()), Some("load"));
    assert_eq!(
        flow.node("load").and_then(|n| n.params.get("table")),
        Some(&serde_json::json!("orders"))
    );

    let (nodes, edges) = flow.graph_input();
    assert_eq!(nodes[0].payload.as_deref(), Some("1"));
    let r = resolve(&nodes, &edges);
    assert_eq!(r.order_of("extract"), Some(1));
    assert_eq!(r.order_of("load"), Some(2));
    Ok(())
}

#[test]
fn toml_document_loads_conditions_and_strategy() -> TestResult {
    let file = toml_file(
        r#"
name = "reports"
status = "disabled"

[dag_config]
error_strategy = "skip_downstream"
max_parallel = 2
edges = [
    { source = "build", target = "notify" },
]

[[dag_config.nodes]]
id = "build"
job_id = 7

[[dag_config.nodes]]
id = "notify"
condition = { type = "node_failed", node_id = "build" }
upstream_results = { build = "build_output" }
"#,
    )?;

    let flow = load_and_validate(file.path())?;

    assert_eq!(flow.status(), FlowStatus::Disabled);
    assert_eq!(flow.dag().error_strategy, ErrorStrategy::SkipDownstream);
    assert_eq!(flow.dag().max_parallel, 2);
    let notify = flow.node("notify").unwrap();
    assert!(notify.is_virtual());
    assert_eq!(
        notify.condition,
        Some(NodeCondition::NodeFailed {
            node_id: "build".to_string()
        })
    );
    assert_eq!(notify.referenced_nodes().collect::<Vec<_>>(), vec!["build", "build"]);
    Ok(())
}

#[test]
fn cyclic_graph_still_loads() -> TestResult {
    let raw = parse_str(
        r#"{"name": "loop", "dag_config": {
            "nodes": [{"id": "A"}, {"id": "B"}],
            "edges": [{"source": "A", "target": "B"}, {"source": "B", "target": "A"}, {"source": "A", "target": "missing"}]
        }}"#,
        DocumentFormat::Json,
    )?;

    let flow = FlowDefinition::try_from(raw)?;
    let (nodes, edges) = flow.graph_input();

    assert!(resolve(&nodes, &edges).cycle.is_some());
    Ok(())
}

#[test]
fn missing_edges_key_is_rejected() -> TestResult {
    let file = json_file(r#"{"name": "x", "dag_config": {"nodes": []}}"#)?;

    match load_and_validate(file.path()) {
        Err(FlowdagError::JsonError(e)) => assert!(e.to_string().contains("edges")),
        Err(e) => panic!("Expected JsonError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[test]
fn missing_nodes_key_is_rejected_in_toml() -> TestResult {
    let file = toml_file("name = \"x\"\n[dag_config]\nedges = []\n")?;

    match load_and_validate(file.path()) {
        Err(FlowdagError::TomlError(e)) => assert!(e.to_string().contains("nodes")),
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[test]
fn zero_max_parallel_is_a_config_error() -> TestResult {
    let raw = parse_str(
        r#"{"name": "x", "dag_config": {"nodes": [], "edges": [], "max_parallel": 0}}"#,
        DocumentFormat::Json,
    )?;

    match FlowDefinition::try_from(raw) {
        Err(FlowdagError::ConfigError(msg)) => assert!(msg.contains("max_parallel")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|f| f.name().to_string())),
    }
    Ok(())
}

#[test]
fn short_cron_expression_is_a_config_error() -> TestResult {
    let raw = parse_str(
        r#"{"name": "x", "cron_expr": "0 2 *", "dag_config": {"nodes": [], "edges": []}}"#,
        DocumentFormat::Json,
    )?;

    let err = FlowDefinition::try_from(raw).unwrap_err();
    assert!(err.to_string().contains("cron_expr"));
    Ok(())
}

#[test]
fn cron_expression_with_six_fields_loads_but_seven_is_rejected() -> TestResult {
    let doc = |cron: &str| {
        format!(
            r#"{{"name": "x", "cron_expr": "{cron}", "dag_config": {{"nodes": [], "edges": []}}}}"#
        )
    };

    let six = parse_str(&doc("0 0 2 * * *"), DocumentFormat::Json)?;
    assert!(FlowDefinition::try_from(six).is_ok());

    let seven = parse_str(&doc("0 2 * * * * *"), DocumentFormat::Json)?;
    match FlowDefinition::try_from(seven) {
        Err(FlowdagError::ConfigError(msg)) => {
            assert!(msg.contains("5 or 6 fields"), "message was: {msg}");
            assert!(msg.contains("got 7"), "message was: {msg}");
        }
        other => panic!("Expected ConfigError, got: {:?}", other.map(|f| f.name().to_string())),
    }
    Ok(())
}

#[test]
fn condition_on_unknown_node_is_a_config_error() -> TestResult {
    let raw = parse_str(
        r#"{"name": "x", "dag_config": {
            "nodes": [{"id": "A", "condition": {"type": "node_success", "node_id": "nope"}}],
            "edges": []
        }}"#,
        DocumentFormat::Json,
    )?;

    let err = FlowDefinition::try_from(raw).unwrap_err();
    assert!(err.to_string().contains("unknown node 'nope'"));
    Ok(())
}

#[test]
fn unknown_error_strategy_fails_to_parse() {
    let result = parse_str(
        r#"{"name": "x", "dag_config": {"nodes": [], "edges": [], "error_strategy": "retry"}}"#,
        DocumentFormat::Json,
    );

    assert!(matches!(result, Err(FlowdagError::JsonError(_))));
}

#[test]
fn missing_file_error_names_the_path() {
    let result = load_and_validate("definitely/not/here.json");

    match result {
        Err(err @ FlowdagError::ReadError { .. }) => {
            let msg = err.to_string();
            assert!(msg.contains("definitely/not/here.json"), "message was: {msg}");
            assert!(std::error::Error::source(&err).is_some());
        }
        other => panic!("Expected ReadError, got: {:?}", other.map(|f| f.name().to_string())),
    }
}

#[test]
fn format_follows_extension() {
    use std::path::Path;

    assert_eq!(DocumentFormat::from_path(Path::new("a/flow.JSON")), DocumentFormat::Json);
    assert_eq!(DocumentFormat::from_path(Path::new("flow.toml")), DocumentFormat::Toml);
    assert_eq!(DocumentFormat::from_path(Path::new("flow")), DocumentFormat::Toml);
    assert_eq!(DocumentFormat::from_path(&default_flow_path()), DocumentFormat::Json);
}
