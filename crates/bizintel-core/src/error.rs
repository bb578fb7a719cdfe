//! Error types for bizintel-core

use crate::source::BoardId;
use thiserror::Error;

/// Errors a [`BoardSource`](crate::source::BoardSource) can report.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Credentials rejected or missing
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Board id unknown to the source
    #[error("Board not found: {0}")]
    BoardNotFound(BoardId),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered without usable data
    #[error("API error: {0}")]
    Api(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for board source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Fatal pipeline conditions. Nothing is computed once one occurs.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Authentication Failed. Check API Token. ({0})")]
    Authentication(#[source] SourceError),

    #[error("Board Fetch Failed for {label} board {board}. ({source})")]
    Fetch {
        label: &'static str,
        board: BoardId,
        #[source]
        source: SourceError,
    },
}
