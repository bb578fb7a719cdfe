//! Pipeline orchestration: authenticate, fetch, normalize, compute.

use crate::clock::Clock;
use crate::domain::BoardSnapshot;
use crate::error::PipelineError;
use crate::intent::{self, Intent, Response};
use crate::metrics::{self, MetricsBundle};
use crate::normalize::normalize;
use crate::obs::{
    emit_board_fetched, emit_board_normalized, emit_metrics_computed, emit_pipeline_failed,
    emit_pipeline_started, emit_question_answered, emit_role_unresolved, pipeline_span,
};
use crate::present::{MetricTiles, Presenter};
use crate::source::{BoardId, BoardSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, Instrument};
use uuid::Uuid;

/// Default monday.com deals board.
pub const DEFAULT_DEALS_BOARD: BoardId = BoardId(5026841268);

/// Default monday.com work-orders board.
pub const DEFAULT_WORK_ORDERS_BOARD: BoardId = BoardId(5026841696);

/// The two boards one invocation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardIds {
    pub deals: BoardId,
    pub work_orders: BoardId,
}

impl Default for BoardIds {
    fn default() -> Self {
        Self {
            deals: DEFAULT_DEALS_BOARD,
            work_orders: DEFAULT_WORK_ORDERS_BOARD,
        }
    }
}

/// Output of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub deals: BoardSnapshot,
    pub work_orders: BoardSnapshot,
    pub metrics: MetricsBundle,
}

impl Insights {
    pub fn tiles(&self) -> MetricTiles {
        MetricTiles::from_bundle(&self.metrics)
    }

    /// Answer a free-text question from these insights.
    pub fn answer(&self, question: &str) -> Response {
        let response = intent::answer(question, &self.metrics, &self.deals);
        emit_question_answered(&Intent::detect(question).active(), response.blocks.len());
        response
    }
}

/// Whether an interactive session recomputes per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Compute once, answer every question from the same insights.
    #[default]
    Reuse,
    /// Re-run the whole pipeline before each answer.
    Recompute,
}

/// Board-to-answer pipeline built from injected collaborators.
///
/// Holds no cache: every [`compute`](Self::compute) fetches and recomputes.
pub struct InsightPipeline {
    source: Arc<dyn BoardSource>,
    clock: Arc<dyn Clock>,
    boards: BoardIds,
}

impl InsightPipeline {
    pub fn new(source: Arc<dyn BoardSource>, clock: Arc<dyn Clock>, boards: BoardIds) -> Self {
        Self {
            source,
            clock,
            boards,
        }
    }

    pub fn boards(&self) -> BoardIds {
        self.boards
    }

    /// Run the full pipeline once.
    ///
    /// Authentication and board fetches happen strictly in sequence; the
    /// first failure aborts with nothing computed.
    pub async fn compute(&self) -> Result<Insights, PipelineError> {
        let run_id = Uuid::new_v4().to_string();
        let span = pipeline_span(&run_id);
        span.in_scope(|| {
            emit_pipeline_started(&run_id, self.boards.deals, self.boards.work_orders)
        });

        let result = self.compute_inner().instrument(span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| emit_pipeline_failed(&run_id, e));
        }
        result
    }

    async fn compute_inner(&self) -> Result<Insights, PipelineError> {
        self.source
            .authenticate()
            .await
            .map_err(PipelineError::Authentication)?;

        let deals = self.load("deals", self.boards.deals).await?;
        let work_orders = self.load("work orders", self.boards.work_orders).await?;

        let metrics = metrics::compute(&deals, &work_orders, self.clock.now());
        for role in metrics.roles.unresolved() {
            emit_role_unresolved(role);
        }
        emit_metrics_computed(&metrics);

        Ok(Insights {
            deals,
            work_orders,
            metrics,
        })
    }

    async fn load(
        &self,
        label: &'static str,
        board: BoardId,
    ) -> Result<BoardSnapshot, PipelineError> {
        let raw = self
            .source
            .fetch(board)
            .await
            .map_err(|source| PipelineError::Fetch {
                label,
                board,
                source,
            })?;
        emit_board_fetched(label, board, raw.items.len());

        let snapshot = normalize(&raw);
        emit_board_normalized(label, snapshot.len(), &snapshot.quality());
        debug!(label = %label, columns = ?snapshot.columns(), "normalized columns");
        Ok(snapshot)
    }

    /// Drive a presenter: render tiles, then answer questions until input ends.
    ///
    /// Returns the number of questions answered.
    pub async fn serve(
        &self,
        presenter: &mut dyn Presenter,
        policy: RefreshPolicy,
    ) -> Result<usize, PipelineError> {
        let mut insights = self.compute().await?;
        presenter.render_metrics(&insights.tiles());

        let mut answered = 0;
        while let Some(question) = presenter.prompt_question() {
            let question = question.trim();
            if question.is_empty() {
                continue;
            }
            if policy == RefreshPolicy::Recompute {
                insights = self.compute().await?;
                presenter.render_metrics(&insights.tiles());
            }
            presenter.show(&insights.answer(question));
            answered += 1;
        }
        Ok(answered)
    }
}
