// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{FlowDefinition, RawFlowDefinition};
use crate::errors::{FlowdagError, Result};

impl TryFrom<RawFlowDefinition> for FlowDefinition {
    type Error = FlowdagError;

    fn try_from(raw: RawFlowDefinition) -> std::result::Result<Self, Self::Error> {
        validate_raw_definition(&raw)?;
        Ok(FlowDefinition::new_unchecked(raw))
    }
}

/// Document-level checks only.
///
/// This checks:
/// - the flow has a non-empty name
/// - `dag_config.max_parallel >= 1`
/// - `cron_expr`, when present, has 5 or 6 fields
/// - node conditions and `upstream_results` name nodes that exist
///
/// It does **not** reject unknown edge endpoints, duplicate node ids or
/// cycles. Those are normal while a graph is being edited and are reported
/// by the resolver instead.
fn validate_raw_definition(raw: &RawFlowDefinition) -> Result<()> {
    ensure_named(raw)?;
    validate_run_settings(raw)?;
    validate_cron_expr(raw)?;
    validate_node_references(raw)?;
    Ok(())
}

fn ensure_named(raw: &RawFlowDefinition) -> Result<()> {
    if raw.name.trim().is_empty() {
        return Err(FlowdagError::ConfigError(
            "flow definition must have a non-empty `name`".to_string(),
        ));
    }
    Ok(())
}

fn validate_run_settings(raw: &RawFlowDefinition) -> Result<()> {
    // error_strategy is strongly typed and checked during deserialization.
    if raw.dag_config.max_parallel == 0 {
        return Err(FlowdagError::ConfigError(
            "dag_config.max_parallel must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_cron_expr(raw: &RawFlowDefinition) -> Result<()> {
    if let Some(expr) = raw.cron_expr.as_deref() {
        let fields = expr.split_whitespace().count();
        if !(5..=6).contains(&fields) {
            return Err(FlowdagError::ConfigError(format!(
                "cron_expr '{}' must have 5 or 6 fields (minute hour day month weekday, \
                 optionally seconds), got {}",
                expr, fields
            )));
        }
    }
    Ok(())
}

fn validate_node_references(raw: &RawFlowDefinition) -> Result<()> {
    let ids: HashSet<&str> = raw.dag_config.nodes.iter().map(|n| n.id.as_str()).collect();

    for node in raw.dag_config.nodes.iter() {
        for referenced in node.referenced_nodes() {
            if !ids.contains(referenced) {
                return Err(FlowdagError::ConfigError(format!(
                    "node '{}' refers to unknown node '{}' in its condition or upstream_results",
                    node.id, referenced
                )));
            }
        }
    }
    Ok(())
}
