//! GraphQL documents and response envelopes for the monday.com v2 API.
//!
//! Parsing is kept free of I/O so it can be exercised directly against
//! captured payloads.

use crate::error::MondayError;
use bizintel_core::{BoardId, RawColumn, RawItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authentication probe.
pub const ME_QUERY: &str = "query { me { id name } }";

/// First page of a board: schema plus items.
pub const BOARD_QUERY: &str = "query ($ids: [ID!], $limit: Int!) { \
boards(ids: $ids) { \
columns { id title } \
items_page(limit: $limit) { cursor items { name column_values { id text } } } \
} }";

/// Follow-up pages, keyed by the cursor of the previous page.
pub const NEXT_PAGE_QUERY: &str = "query ($cursor: String!, $limit: Int!) { \
next_items_page(cursor: $cursor, limit: $limit) { \
cursor items { name column_values { id text } } \
} }";

/// Request body posted to the endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub variables: Value,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            variables: Value::Null,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// Response envelope. monday also reports some failures through a
/// top-level `error_message` instead of `errors`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// Human-readable summary of whatever the server complained about.
    pub fn describe_errors(&self) -> String {
        let mut parts: Vec<&str> = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .collect();
        if let Some(msg) = self.error_message.as_deref() {
            parts.push(msg);
        }
        if parts.is_empty() {
            "response carried no data".to_string()
        } else {
            parts.join("; ")
        }
    }

    /// Unwrap `data`, turning its absence into an API error.
    pub fn into_data(self) -> Result<T, MondayError> {
        let message = self.describe_errors();
        self.data.ok_or(MondayError::Api(message))
    }
}

#[derive(Debug, Deserialize)]
pub struct Me {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeData {
    pub me: Option<Me>,
}

/// One page of items plus the cursor for the next one.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub struct BoardPayload {
    #[serde(default)]
    pub columns: Vec<RawColumn>,
    #[serde(default)]
    pub items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
pub struct BoardsData {
    #[serde(default)]
    pub boards: Vec<BoardPayload>,
}

#[derive(Debug, Deserialize)]
pub struct NextPageData {
    pub next_items_page: ItemsPage,
}

/// Authentication succeeds iff the response carries `data`.
pub fn parse_me(body: Value) -> Result<Option<String>, MondayError> {
    let response: GraphQlResponse<MeData> = serde_json::from_value(body)?;
    match response.data {
        Some(data) => Ok(data.me.and_then(|me| me.name)),
        None => Err(MondayError::Unauthorized(response.describe_errors())),
    }
}

/// First board page. An empty `boards` list means the id is unknown.
pub fn parse_board(board: BoardId, body: Value) -> Result<BoardPayload, MondayError> {
    let response: GraphQlResponse<BoardsData> = serde_json::from_value(body)?;
    response
        .into_data()?
        .boards
        .into_iter()
        .next()
        .ok_or(MondayError::BoardNotFound(board))
}

pub fn parse_next_page(body: Value) -> Result<ItemsPage, MondayError> {
    let response: GraphQlResponse<NextPageData> = serde_json::from_value(body)?;
    Ok(response.into_data()?.next_items_page)
}
