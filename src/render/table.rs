// src/render/table.rs

use std::fmt::Write;

use crate::render::report::FlowReport;
use crate::render::rows::{NodeRow, RowStatus};

const HEADERS: [&str; 7] = ["ORDER", "STAGE", "NODE", "LABEL", "JOB", "DEPENDS ON", "STATUS"];

/// Fixed-width text rendering of a report.
///
/// Unresolved nodes show `-` for order and stage and a `CYCLE` / `BLOCKED`
/// status, followed by a section listing each cycle and any dangling edge.
pub fn render_table(report: &FlowReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "flow: {} ({:?}, error_strategy = {}, max_parallel = {})",
        report.flow, report.status, report.error_strategy, report.max_parallel
    );
    let _ = writeln!(out);

    let cells: Vec<[String; 7]> = report.rows.iter().map(row_cells).collect();
    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_line(&mut out, &HEADERS.map(String::from), &widths);
    for row in &cells {
        write_line(&mut out, row, &widths);
    }

    if !report.cycles.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "cycles ({}):", report.cycles.len());
        for cycle in &report.cycles {
            let _ = writeln!(out, "  - {}", cycle.join(" <-> "));
        }
    }

    let blocked: Vec<&str> = report
        .rows
        .iter()
        .filter(|r| r.status == RowStatus::Blocked)
        .map(|r| r.id.as_str())
        .collect();
    if !blocked.is_empty() {
        let _ = writeln!(out, "blocked by cycles: {}", blocked.join(", "));
    }

    if !report.dangling.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "edges with unknown endpoints ({}):", report.dangling.len());
        for edge in &report.dangling {
            let _ = writeln!(out, "  - {edge}");
        }
    }

    if !report.issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "validation issues ({}):", report.issues.len());
        for issue in &report.issues {
            let _ = writeln!(out, "  - {issue}");
        }
    }

    if let Some(batches) = &report.batches {
        let _ = writeln!(out);
        let _ = writeln!(out, "batch plan ({} batches):", batches.len());
        for batch in batches {
            let _ = writeln!(
                out,
                "  #{} stage {}: {}",
                batch.index,
                batch.stage,
                batch.nodes.join(", ")
            );
        }
    }

    out
}

fn row_cells(row: &NodeRow) -> [String; 7] {
    let dash = || "-".to_string();
    [
        row.order.map(|o| o.to_string()).unwrap_or_else(dash),
        row.stage.map(|s| s.to_string()).unwrap_or_else(dash),
        row.id.clone(),
        row.label.clone(),
        row.job_id.map(|j| j.to_string()).unwrap_or_else(dash),
        if row.dependencies.is_empty() {
            dash()
        } else {
            row.dependencies.join(", ")
        },
        match row.status {
            RowStatus::Ordered => "ok".to_string(),
            RowStatus::Cyclic => "CYCLE".to_string(),
            RowStatus::Blocked => "BLOCKED".to_string(),
        },
    ]
}

fn write_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
