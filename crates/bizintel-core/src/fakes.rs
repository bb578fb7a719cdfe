//! In-memory fakes for the collaborator traits (testing only)
//!
//! Provides `StaticBoardSource` and `RecordingPresenter`, which satisfy the
//! `BoardSource` and `Presenter` contracts without network or terminal.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::RawBoard;
use crate::error::{SourceError, SourceResult};
use crate::intent::Response;
use crate::present::{MetricTiles, Presenter};
use crate::source::{BoardId, BoardSource};

// ---------------------------------------------------------------------------
// StaticBoardSource
// ---------------------------------------------------------------------------

/// Board source serving fixed boards from a `HashMap<BoardId, RawBoard>`.
#[derive(Debug, Default)]
pub struct StaticBoardSource {
    boards: HashMap<BoardId, RawBoard>,
    reject_auth: bool,
    calls: Mutex<Vec<String>>,
}

impl StaticBoardSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(mut self, board: BoardId, raw: RawBoard) -> Self {
        self.boards.insert(board, raw);
        self
    }

    /// Make `authenticate` fail.
    pub fn rejecting_auth(mut self) -> Self {
        self.reject_auth = true;
        self
    }

    /// Calls received so far, e.g. `["authenticate", "fetch:1"]`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BoardSource for StaticBoardSource {
    async fn authenticate(&self) -> SourceResult<()> {
        self.log("authenticate".to_string());
        if self.reject_auth {
            return Err(SourceError::Unauthorized("token rejected".to_string()));
        }
        Ok(())
    }

    async fn fetch(&self, board: BoardId) -> SourceResult<RawBoard> {
        self.log(format!("fetch:{}", board));
        self.boards
            .get(&board)
            .cloned()
            .ok_or(SourceError::BoardNotFound(board))
    }
}

// ---------------------------------------------------------------------------
// RecordingPresenter
// ---------------------------------------------------------------------------

/// Presenter that replays scripted questions and records everything shown.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    questions: VecDeque<String>,
    pub tiles: Vec<MetricTiles>,
    pub shown: Vec<Response>,
}

impl RecordingPresenter {
    pub fn new<I, S>(questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            questions: questions.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

impl Presenter for RecordingPresenter {
    fn render_metrics(&mut self, tiles: &MetricTiles) {
        self.tiles.push(*tiles);
    }

    fn prompt_question(&mut self) -> Option<String> {
        self.questions.pop_front()
    }

    fn show(&mut self, response: &Response) {
        self.shown.push(response.clone());
    }
}
