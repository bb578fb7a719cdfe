//! Keyword intent detection and answer assembly.
//!
//! Intents are independent flags found by substring tests on the lowercased
//! question. Each active intent contributes one block, always in
//! [`IntentKind::ORDERED`] order.

use crate::domain::BoardSnapshot;
use crate::metrics::MetricsBundle;
use serde::{Deserialize, Serialize};

/// Reply when no intent matches.
pub const HELP_TEXT: &str = "I can assist with pipeline, forecast, sector analysis, quarter performance, risk exposure, or leadership summary.";

const CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Pipeline,
    Forecast,
    Sector,
    Quarter,
    Risk,
    Leadership,
}

impl IntentKind {
    /// Block emission order.
    pub const ORDERED: [IntentKind; 6] = [
        IntentKind::Pipeline,
        IntentKind::Forecast,
        IntentKind::Sector,
        IntentKind::Quarter,
        IntentKind::Risk,
        IntentKind::Leadership,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            IntentKind::Pipeline => &["pipeline", "revenue", "deal value"],
            IntentKind::Forecast => &["forecast", "expected"],
            IntentKind::Sector => &["sector", "industry"],
            IntentKind::Quarter => &["quarter"],
            IntentKind::Risk => &["risk", "exposure"],
            IntentKind::Leadership => &["leadership", "summary", "board"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntentKind::Pipeline => "pipeline",
            IntentKind::Forecast => "forecast",
            IntentKind::Sector => "sector",
            IntentKind::Quarter => "quarter",
            IntentKind::Risk => "risk",
            IntentKind::Leadership => "leadership",
        }
    }
}

/// Flags detected in one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub pipeline: bool,
    pub forecast: bool,
    pub sector: bool,
    pub quarter: bool,
    pub risk: bool,
    pub leadership: bool,
}

impl Intent {
    pub fn detect(question: &str) -> Self {
        let q = question.to_lowercase();
        let hit = |kind: IntentKind| kind.keywords().iter().any(|k| q.contains(k));
        Self {
            pipeline: hit(IntentKind::Pipeline),
            forecast: hit(IntentKind::Forecast),
            sector: hit(IntentKind::Sector),
            quarter: hit(IntentKind::Quarter),
            risk: hit(IntentKind::Risk),
            leadership: hit(IntentKind::Leadership),
        }
    }

    pub fn is_set(&self, kind: IntentKind) -> bool {
        match kind {
            IntentKind::Pipeline => self.pipeline,
            IntentKind::Forecast => self.forecast,
            IntentKind::Sector => self.sector,
            IntentKind::Quarter => self.quarter,
            IntentKind::Risk => self.risk,
            IntentKind::Leadership => self.leadership,
        }
    }

    /// Active intents in emission order.
    pub fn active(&self) -> Vec<IntentKind> {
        IntentKind::ORDERED
            .into_iter()
            .filter(|k| self.is_set(*k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// One titled block of an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBlock {
    pub heading: String,
    pub bullets: Vec<String>,
}

impl ResponseBlock {
    fn new(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            bullets: Vec::new(),
        }
    }

    fn bullet(mut self, line: impl Into<String>) -> Self {
        self.bullets.push(line.into());
        self
    }
}

/// Ordered answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub blocks: Vec<ResponseBlock>,
}

impl Response {
    pub fn help() -> Self {
        Self {
            blocks: vec![ResponseBlock::new(HELP_TEXT)],
        }
    }

    /// Flattened text: each heading followed by its `- `-prefixed bullets.
    pub fn lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|b| {
                std::iter::once(b.heading.clone())
                    .chain(b.bullets.iter().map(|l| format!("- {}", l)))
            })
            .collect()
    }

    pub fn headings(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.heading.as_str()).collect()
    }

    pub fn is_help(&self) -> bool {
        *self == Response::help()
    }
}

/// Answer `question` from a computed bundle.
///
/// Falls back to the help text when no intent matches or when every
/// matching block is unavailable.
pub fn answer(question: &str, bundle: &MetricsBundle, deals: &BoardSnapshot) -> Response {
    let blocks: Vec<ResponseBlock> = Intent::detect(question)
        .active()
        .into_iter()
        .filter_map(|kind| block_for(kind, bundle, deals))
        .collect();

    if blocks.is_empty() {
        return Response::help();
    }
    Response { blocks }
}

fn block_for(
    kind: IntentKind,
    bundle: &MetricsBundle,
    deals: &BoardSnapshot,
) -> Option<ResponseBlock> {
    let block = match kind {
        IntentKind::Pipeline => ResponseBlock::new("Pipeline Overview")
            .bullet(format!("Total Pipeline: {}", format_currency(bundle.total_pipeline)))
            .bullet(format!("Active Deals: {}", deals.len())),

        IntentKind::Forecast => ResponseBlock::new("Forecast Analysis").bullet(format!(
            "Weighted Forecast: {}",
            format_currency(bundle.weighted_forecast)
        )),

        IntentKind::Sector => {
            if bundle.sector_totals.is_empty() {
                return None;
            }
            bundle
                .sector_totals
                .iter()
                .fold(ResponseBlock::new("Sector Breakdown"), |block, s| {
                    block.bullet(format!("{}: {}", s.sector, format_currency(s.total)))
                })
        }

        IntentKind::Quarter => {
            let total = bundle.current_quarter_pipeline?;
            ResponseBlock::new("Current Quarter Performance")
                .bullet(format!("Pipeline This Quarter: {}", format_currency(total)))
        }

        IntentKind::Risk => {
            let risk = bundle.risk.as_ref()?;
            ResponseBlock::new("Risk Exposure Analysis")
                .bullet(format!("Highest Exposure: {}", risk.dominant_sector))
                .bullet(format!("Concentration Risk: {:.2}%", risk.concentration_pct))
        }

        IntentKind::Leadership => ResponseBlock::new("Executive Snapshot")
            .bullet(format!("Total Pipeline: {}", format_currency(bundle.total_pipeline)))
            .bullet(format!(
                "Weighted Forecast: {}",
                format_currency(bundle.weighted_forecast)
            ))
            .bullet(format!("Active Deals: {}", deals.len()))
            .bullet(format!("Total Work Orders: {}", bundle.total_work_orders)),
    };
    Some(block)
}

/// `₹` amount with two decimals.
pub fn format_currency(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}
