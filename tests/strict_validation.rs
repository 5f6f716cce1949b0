use std::error::Error;

use flowdag::errors::FlowdagError;
use flowdag::graph::{ensure_valid, validate_graph, Edge, GraphIssue, Node};
use flowdag_test_utils::builders::GraphBuilder;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn clean_graph_has_no_issues() -> TestResult {
    let (nodes, edges) = GraphBuilder::new()
        .nodes(["A", "B", "C"])
        .chain(["A", "B", "C"])
        .build();

    assert!(validate_graph(&nodes, &edges).is_empty());
    ensure_valid(&nodes, &edges)?;
    Ok(())
}

#[test]
fn unknown_reference_names_the_missing_endpoint() {
    let (nodes, edges) = GraphBuilder::new()
        .nodes(["A"])
        .edge("A", "B")
        .build();

    let issues = validate_graph(&nodes, &edges);

    assert_eq!(
        issues,
        vec![GraphIssue::UnknownReference {
            edge: Edge::new("A", "B"),
            missing: "B".to_string(),
        }]
    );
    assert_eq!(issues[0].to_string(), "edge 'A -> B' references unknown node 'B'");
}

#[test]
fn duplicate_ids_are_reported_once() {
    let nodes = vec![Node::new("A"), Node::new("A"), Node::new("A")];

    let issues = validate_graph(&nodes, &[]);

    assert_eq!(
        issues,
        vec![GraphIssue::DuplicateNodeId { id: "A".to_string() }]
    );
}

#[test]
fn repeated_self_loop_is_reported_once() {
    let (nodes, edges) = GraphBuilder::new()
        .nodes(["A", "B"])
        .edge("A", "A")
        .edge("A", "B")
        .edge("A", "A")
        .build();

    let issues = validate_graph(&nodes, &edges);

    assert_eq!(issues, vec![GraphIssue::SelfLoop { id: "A".to_string() }]);
}

#[test]
fn empty_id_is_reported_by_position() {
    let nodes = vec![Node::new("A"), Node::new("  ")];

    let issues = validate_graph(&nodes, &[]);

    assert_eq!(issues, vec![GraphIssue::EmptyNodeId { position: 1 }]);
}

#[test]
fn self_loop_and_cycle_are_reported_separately() {
    let (nodes, edges) = GraphBuilder::new()
        .nodes(["A", "B", "C"])
        .edge("A", "A")
        .edge("B", "C")
        .edge("C", "B")
        .build();

    let issues = validate_graph(&nodes, &edges);

    assert_eq!(
        issues,
        vec![
            GraphIssue::SelfLoop { id: "A".to_string() },
            GraphIssue::Cycle {
                nodes: vec!["B".to_string(), "C".to_string()],
            },
        ]
    );
}

#[test]
fn ensure_valid_returns_structured_error() {
    let (nodes, edges) = GraphBuilder::new()
        .nodes(["A", "B"])
        .edge("A", "B")
        .edge("B", "A")
        .build();

    match ensure_valid(&nodes, &edges) {
        Err(FlowdagError::InvalidGraph(issues)) => {
            assert_eq!(issues.len(), 1);
            assert!(issues[0].to_string().contains("cycle detected"));
        }
        Err(e) => panic!("Expected InvalidGraph error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
