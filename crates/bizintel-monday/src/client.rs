//! monday.com GraphQL client
//!
//! Implements [`BoardSource`] over the v2 API: one authentication probe,
//! then one `boards` query per board followed by `next_items_page` calls
//! until the cursor runs out.

use crate::config::MondayConfig;
use crate::error::MondayError;
use crate::graphql::{
    parse_board, parse_me, parse_next_page, GraphQlRequest, BOARD_QUERY, ME_QUERY,
    NEXT_PAGE_QUERY,
};
use crate::Result;
use async_trait::async_trait;
use bizintel_core::{BoardId, BoardSource, RawBoard, SourceResult};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// monday.com client for board reads
pub struct MondayClient {
    config: MondayConfig,
    http_client: reqwest::Client,
}

impl MondayClient {
    /// Create a new monday.com client
    pub fn new(config: MondayConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("bizintel-monday/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(MondayClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(MondayConfig::from_env())
    }

    pub fn config(&self) -> &MondayConfig {
        &self.config
    }

    /// POST one GraphQL document and return the decoded JSON body.
    async fn post(&self, request: &GraphQlRequest<'_>) -> Result<Value> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or(MondayError::MissingToken)?;

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header("Authorization", token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(MondayError::Http(format!("{}: {}", status, body.trim()))),
        }
    }

    /// Check that the configured token is accepted.
    ///
    /// Returns the account name when the API reports one.
    pub async fn whoami(&self) -> Result<Option<String>> {
        let body = self.post(&GraphQlRequest::new(ME_QUERY)).await?;
        parse_me(body)
    }

    /// Fetch a board's schema and every item, following pagination.
    pub async fn board(&self, board: BoardId) -> Result<RawBoard> {
        let limit = self.config.page_size;
        let request = GraphQlRequest::new(BOARD_QUERY)
            .with_variables(json!({ "ids": [board.to_string()], "limit": limit }));
        let payload = parse_board(board, self.post(&request).await?)?;

        let mut items = payload.items_page.items;
        let mut cursor = payload.items_page.cursor;
        let mut pages = 1;
        while let Some(next) = cursor.take() {
            let request = GraphQlRequest::new(NEXT_PAGE_QUERY)
                .with_variables(json!({ "cursor": next, "limit": limit }));
            let page = parse_next_page(self.post(&request).await?)?;
            debug!(
                board = %board,
                page = pages,
                items = page.items.len(),
                "fetched next items page"
            );
            items.extend(page.items);
            cursor = page.cursor;
            pages += 1;
        }

        debug!(board = %board, pages, items = items.len(), "board fetched");
        Ok(RawBoard {
            columns: payload.columns,
            items,
        })
    }
}

#[async_trait]
impl BoardSource for MondayClient {
    async fn authenticate(&self) -> SourceResult<()> {
        let name = self.whoami().await?;
        info!(account = name.as_deref().unwrap_or("unknown"), "monday.com token accepted");
        Ok(())
    }

    async fn fetch(&self, board: BoardId) -> SourceResult<RawBoard> {
        Ok(self.board(board).await?)
    }
}
