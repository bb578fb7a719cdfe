//! Error types for bizintel-monday

use bizintel_core::{BoardId, SourceError};
use thiserror::Error;

/// Errors that can occur talking to monday.com
#[derive(Error, Debug)]
pub enum MondayError {
    /// No API token configured
    #[error("monday.com API token is not configured")]
    MissingToken,

    /// Authentication probe returned no data
    #[error("monday.com rejected the token: {0}")]
    Unauthorized(String),

    /// Board query returned no board
    #[error("Board not found: {0}")]
    BoardNotFound(BoardId),

    /// Response carried no `data` member
    #[error("monday.com API error: {0}")]
    Api(String),

    /// Transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for MondayError {
    fn from(err: reqwest::Error) -> Self {
        MondayError::Http(err.to_string())
    }
}

impl From<MondayError> for SourceError {
    fn from(err: MondayError) -> Self {
        match err {
            MondayError::MissingToken => SourceError::Unauthorized(err.to_string()),
            MondayError::Unauthorized(msg) => SourceError::Unauthorized(msg),
            MondayError::BoardNotFound(board) => SourceError::BoardNotFound(board),
            MondayError::Api(msg) => SourceError::Api(msg),
            MondayError::Http(msg) => SourceError::Http(msg),
            MondayError::Json(e) => SourceError::Json(e),
        }
    }
}
