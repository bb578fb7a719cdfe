//! Presentation seam: metric tiles, question prompt, rendered answers.

use crate::intent::Response;
use crate::metrics::MetricsBundle;
use serde::{Deserialize, Serialize};

/// The three dashboard tiles. Money tiles are rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTiles {
    pub total_pipeline: f64,
    pub weighted_forecast: f64,
    pub total_work_orders: usize,
}

impl MetricTiles {
    pub fn from_bundle(bundle: &MetricsBundle) -> Self {
        Self {
            total_pipeline: round2(bundle.total_pipeline),
            weighted_forecast: round2(bundle.weighted_forecast),
            total_work_orders: bundle.total_work_orders,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Display and input surface driven by the pipeline.
pub trait Presenter {
    fn render_metrics(&mut self, tiles: &MetricTiles);

    /// Next question, or `None` once input is exhausted.
    fn prompt_question(&mut self) -> Option<String>;

    /// Render an answer; the first line of each block is its heading.
    fn show(&mut self, response: &Response);
}
