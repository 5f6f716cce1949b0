use std::error::Error;

use flowdag::cli::OutputFormat;
use flowdag::render::{render, RowStatus};
use flowdag::{analyze, ReportOptions};
use flowdag_test_utils::builders::{FlowDefinitionBuilder, NodeSpecBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn etl_with_loop() -> flowdag::config::FlowDefinition {
    FlowDefinitionBuilder::new("etl")
        .max_parallel(1)
        .with_node(NodeSpecBuilder::new("extract").job(1).name("Extract").build())
        .with_node(NodeSpecBuilder::new("retry_a").job(2).build())
        .with_node(NodeSpecBuilder::new("retry_b").job(3).build())
        .with_node(NodeSpecBuilder::new("publish").job(4).job_type("http").build())
        .with_node(NodeSpecBuilder::new("transform").job(5).build())
        .with_edge("extract", "transform")
        .with_edge("retry_a", "retry_b")
        .with_edge("retry_b", "retry_a")
        .with_edge("retry_b", "publish")
        .with_edge("phantom", "transform")
        .build()
}

#[test]
fn rows_put_ordered_nodes_first_and_mark_the_rest() {
    let report = analyze(&etl_with_loop(), &ReportOptions::default());

    let summary: Vec<(&str, Option<usize>, RowStatus)> = report
        .rows
        .iter()
        .map(|r| (r.id.as_str(), r.order, r.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("extract", Some(1), RowStatus::Ordered),
            ("transform", Some(2), RowStatus::Ordered),
            ("retry_a", None, RowStatus::Cyclic),
            ("retry_b", None, RowStatus::Cyclic),
            ("publish", None, RowStatus::Blocked),
        ]
    );
    assert_eq!(report.rows[0].label, "Extract");
    assert_eq!(report.rows[1].dependencies, vec!["extract", "phantom"]);
    assert!(report.has_unresolved());
    assert!(report.issues.is_empty());
    assert!(report.batches.is_none());
}

#[test]
fn table_highlights_cycles_and_dangling_edges() -> TestResult {
    let report = analyze(&etl_with_loop(), &ReportOptions::default());

    let table = render(&report, OutputFormat::Table)?;

    assert!(table.starts_with("flow: etl"));
    assert!(table.contains("CYCLE"));
    assert!(table.contains("BLOCKED"));
    assert!(table.contains("retry_a <-> retry_b"));
    assert!(table.contains("blocked by cycles: publish"));
    assert!(table.contains("phantom -> transform"));
    Ok(())
}

#[test]
fn plan_and_issues_are_attached_on_request() -> TestResult {
    let options = ReportOptions {
        validate: true,
        plan: true,
    };
    let report = analyze(&etl_with_loop(), &options);

    let batches = report.batches.as_ref().expect("plan requested");
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].nodes, vec!["extract"]);
    assert_eq!(batches[1].nodes, vec!["transform"]);
    // One unknown reference plus one cycle.
    assert_eq!(report.issues.len(), 2);

    let table = render(&report, OutputFormat::Table)?;
    assert!(table.contains("batch plan (2 batches):"));
    assert!(table.contains("validation issues (2):"));
    Ok(())
}

#[test]
fn json_output_is_machine_readable() -> TestResult {
    let report = analyze(&etl_with_loop(), &ReportOptions::default());

    let json = render(&report, OutputFormat::Json)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    assert_eq!(value["flow"], "etl");
    assert_eq!(value["error_strategy"], "fail_fast");
    assert_eq!(value["rows"][0]["id"], "extract");
    assert_eq!(value["rows"][2]["status"], "cyclic");
    assert_eq!(value["rows"][4]["status"], "blocked");
    assert_eq!(value["cycles"][0][1], "retry_b");
    assert_eq!(value["dangling"][0]["source"], "phantom");
    assert!(value.get("batches").is_none());
    Ok(())
}

#[test]
fn table_columns_line_up_with_multibyte_labels() -> TestResult {
    let flow = FlowDefinitionBuilder::new("cn")
        .with_node(NodeSpecBuilder::new("extract").job(1).name("数据抽取").build())
        .with_node(NodeSpecBuilder::new("load").job(2).name("Load").build())
        .with_edge("extract", "load")
        .build();
    let report = analyze(&flow, &ReportOptions::default());

    let table = render(&report, OutputFormat::Table)?;

    let column_of = |needle: &str| -> Vec<usize> {
        table
            .lines()
            .filter_map(|line| line.rfind(needle).map(|at| line[..at].chars().count()))
            .collect()
    };
    let status_header = column_of("STATUS");
    let ok_cells = column_of("ok");
    assert_eq!(status_header.len(), 1);
    assert_eq!(ok_cells, vec![status_header[0]; 2], "table was:\n{table}");
    Ok(())
}
