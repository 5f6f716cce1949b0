use std::error::Error;
use std::path::PathBuf;

use flowdag::config::load_and_validate;
use flowdag::graph::{plan_batches, resolve};
use flowdag::render::RowStatus;
use flowdag::{analyze, ReportOptions};

type TestResult = Result<(), Box<dyn Error>>;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn nightly_etl_resolves_in_three_stages() -> TestResult {
    let flow = load_and_validate(demo("nightly-etl.json"))?;
    let (nodes, edges) = flow.graph_input();

    let r = resolve(&nodes, &edges).into_result()?;

    assert_eq!(
        r.sequence,
        vec!["start", "orders", "customers", "fx_rates", "join", "report", "alert"]
    );
    assert_eq!(r.stage_of("fx_rates"), Some(2));
    assert_eq!(r.stage_of("report"), Some(4));
    assert_eq!(r.dependencies_of("report"), ["fx_rates".to_string(), "join".to_string()]);

    let batches = plan_batches(&r, flow.dag().max_parallel);
    assert_eq!(batches[1].nodes, vec!["orders", "customers"]);
    assert_eq!(batches[2].nodes, vec!["fx_rates"]);
    Ok(())
}

#[test]
fn editing_demo_renders_with_cycle_and_dangling_edge() -> TestResult {
    let flow = load_and_validate(demo("editing.toml"))?;

    let report = analyze(&flow, &ReportOptions::default());

    let status_of = |id: &str| report.rows.iter().find(|r| r.id == id).map(|r| r.status);
    assert_eq!(status_of("build"), Some(RowStatus::Ordered));
    assert_eq!(status_of("review"), Some(RowStatus::Cyclic));
    assert_eq!(status_of("approve"), Some(RowStatus::Cyclic));
    assert_eq!(status_of("ship"), Some(RowStatus::Blocked));
    assert_eq!(report.dangling.len(), 1);
    assert_eq!(report.dangling[0].source, "lint");
    Ok(())
}
