//! Line-oriented terminal presenter.

use bizintel_core::{format_currency, MetricTiles, Presenter, Response};
use std::io::{BufRead, Write};
use tracing::warn;

/// Presenter reading questions from `input` and writing to `output`.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
    prompt: bool,
}

impl<R: BufRead, W: Write> TerminalPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt: true,
        }
    }

    /// Suppress the `> ` prompt, e.g. when input is piped.
    pub fn without_prompt(mut self) -> Self {
        self.prompt = false;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            warn!(error = %e, "failed to write to terminal");
        }
    }
}

/// Tile lines in dashboard order.
pub fn tile_lines(tiles: &MetricTiles) -> Vec<String> {
    vec![
        format!("Total Pipeline: {}", format_currency(tiles.total_pipeline)),
        format!("Weighted Forecast: {}", format_currency(tiles.weighted_forecast)),
        format!("Total Work Orders: {}", tiles.total_work_orders),
    ]
}

impl<R: BufRead, W: Write> Presenter for TerminalPresenter<R, W> {
    fn render_metrics(&mut self, tiles: &MetricTiles) {
        for line in tile_lines(tiles) {
            self.line(&line);
        }
        self.line("");
    }

    fn prompt_question(&mut self) -> Option<String> {
        if self.prompt {
            let _ = write!(self.output, "> ");
            let _ = self.output.flush();
        }
        let mut buf = String::new();
        match self.input.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read question");
                None
            }
        }
    }

    fn show(&mut self, response: &Response) {
        for line in response.lines() {
            self.line(&line);
        }
        self.line("");
    }
}
