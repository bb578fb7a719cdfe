//! monday.com board source for BizIntel
//!
//! Provides:
//! - `MondayConfig`: endpoint, token and paging settings from the environment
//! - `MondayClient`: GraphQL client implementing `BoardSource`

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;

pub use client::MondayClient;
pub use config::{MondayConfig, DEFAULT_API_URL, MAX_PAGE_SIZE};
pub use error::MondayError;

/// Result type for monday.com operations
pub type Result<T> = std::result::Result<T, MondayError>;
