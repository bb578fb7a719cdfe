//! Structured observability hooks for pipeline invocations.
//!
//! This module provides:
//! - An invocation-scoped tracing span tagged with the run id
//! - Emission functions for lifecycle events: start, fetch, normalize,
//!   metrics, answer, failure
//!
//! Events are emitted at `info!` level unless noted; see
//! [`init_tracing`](crate::telemetry::init_tracing) for filtering and JSON output.

use crate::domain::DataQuality;
use crate::intent::IntentKind;
use crate::metrics::MetricsBundle;
use crate::roles::ColumnRole;
use crate::source::BoardId;
use tracing::{info, warn, Span};

/// Span grouping every event of one pipeline invocation.
///
/// Attach it to the invocation future with `tracing::Instrument`.
///
/// # Example
///
/// ```ignore
/// compute().instrument(pipeline_span("5b1c...")).await
/// // every event inside carries run_id = "5b1c..."
/// ```
pub fn pipeline_span(run_id: &str) -> Span {
    tracing::info_span!("insight.run", run_id = %run_id)
}

/// Emit event: pipeline started for the given boards.
pub fn emit_pipeline_started(run_id: &str, deals: BoardId, work_orders: BoardId) {
    info!(event = "pipeline.started", run_id = %run_id, deals = %deals, work_orders = %work_orders);
}

/// Emit event: a board was fetched.
pub fn emit_board_fetched(label: &str, board: BoardId, items: usize) {
    info!(event = "board.fetched", label = %label, board = %board, items = items);
}

/// Emit event: a board was normalized, with its data-quality tally.
pub fn emit_board_normalized(label: &str, records: usize, quality: &DataQuality) {
    info!(
        event = "board.normalized",
        label = %label,
        records = records,
        dropped_rows = quality.dropped_rows,
        coerced_numeric = quality.coerced_numeric,
        null_dates = quality.null_dates,
        missing_cells = quality.missing_cells,
    );
}

/// Emit event: a column role could not be resolved (warn level).
pub fn emit_role_unresolved(role: ColumnRole) {
    warn!(event = "role.unresolved", role = %role.name());
}

/// Emit event: metrics computed.
pub fn emit_metrics_computed(bundle: &MetricsBundle) {
    info!(
        event = "metrics.computed",
        total_pipeline = bundle.total_pipeline,
        weighted_forecast = bundle.weighted_forecast,
        total_work_orders = bundle.total_work_orders,
        sectors = bundle.sector_totals.len(),
        has_risk = bundle.risk.is_some(),
        has_quarter = bundle.current_quarter_pipeline.is_some(),
    );
}

/// Emit event: a question was answered.
pub fn emit_question_answered(intents: &[IntentKind], blocks: usize) {
    let names: Vec<&str> = intents.iter().map(|k| k.name()).collect();
    info!(event = "question.answered", intents = ?names, blocks = blocks);
}

/// Emit event: pipeline aborted on a fatal error (warn level).
pub fn emit_pipeline_failed(run_id: &str, error: &dyn std::fmt::Display) {
    warn!(event = "pipeline.failed", run_id = %run_id, error = %error);
}
