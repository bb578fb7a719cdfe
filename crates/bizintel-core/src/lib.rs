//! BizIntel Core Library
//!
//! Turns raw project-tracking boards into typed snapshots, derives pipeline
//! metrics from them and answers keyword questions against those metrics.
//!
//! Data flow: `BoardSource` → [`normalize`] → [`metrics::compute`] (with
//! [`roles`]) → [`intent::answer`] → `Presenter`.

pub mod clock;
pub mod domain;
pub mod error;
pub mod fakes;
pub mod intent;
pub mod metrics;
pub mod normalize;
pub mod obs;
pub mod pipeline;
pub mod present;
pub mod roles;
pub mod source;
pub mod telemetry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    BoardSnapshot, CellValue, DataQuality, RawBoard, RawCell, RawColumn, RawItem, Record,
    ITEM_COLUMN,
};
pub use error::{PipelineError, SourceError, SourceResult};
pub use intent::{answer, format_currency, Intent, IntentKind, Response, ResponseBlock, HELP_TEXT};
pub use metrics::{compute, ConcentrationRisk, MetricsBundle, SectorTotal};
pub use normalize::{normalize, renormalize};
pub use pipeline::{BoardIds, InsightPipeline, Insights, RefreshPolicy};
pub use present::{MetricTiles, Presenter};
pub use roles::{resolve_role, ColumnRole, ResolvedRoles};
pub use source::{BoardId, BoardSource, FileBoardSource};
pub use telemetry::init_tracing;

/// BizIntel version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
