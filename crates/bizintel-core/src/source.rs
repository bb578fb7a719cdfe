//! Board sources: where raw boards come from.
//!
//! - `BoardSource`: async seam the pipeline fetches through
//! - `FileBoardSource`: reads `<dir>/<board_id>.json` fixtures
//!
//! Network implementations live in their own crates; in-memory fakes are in
//! the `fakes` module.

use crate::domain::RawBoard;
use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Numeric board identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BoardId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(BoardId)
    }
}

/// Source of raw boards.
///
/// Both calls are fatal on failure as far as the pipeline is concerned; no
/// retries happen at this layer.
#[async_trait]
pub trait BoardSource: Send + Sync {
    /// Verify credentials before anything is fetched.
    async fn authenticate(&self) -> SourceResult<()>;

    /// Fetch one board's schema and items.
    async fn fetch(&self, board: BoardId) -> SourceResult<RawBoard>;
}

/// Board source backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileBoardSource {
    dir: PathBuf,
}

impl FileBoardSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a board is read from.
    pub fn board_path(&self, board: BoardId) -> PathBuf {
        self.dir.join(format!("{}.json", board))
    }
}

#[async_trait]
impl BoardSource for FileBoardSource {
    async fn authenticate(&self) -> SourceResult<()> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(SourceError::Unauthorized(format!(
                "fixture directory {:?} is not readable",
                self.dir
            ))),
        }
    }

    async fn fetch(&self, board: BoardId) -> SourceResult<RawBoard> {
        let path = self.board_path(board);
        debug!(path = %path.display(), "reading board fixture");
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::BoardNotFound(board))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn board_id_parses() {
        assert_eq!(" 5026841268 ".parse::<BoardId>().unwrap(), BoardId(5026841268));
        assert!("deals".parse::<BoardId>().is_err());
    }

    #[tokio::test]
    async fn test_file_source_round_trip() {
        let dir = tempdir().unwrap();
        let board =
            RawBoard::from_titles(["Deal Value"]).with_item("Acme", &[("Deal Value", "10")]);
        std::fs::write(
            dir.path().join("7.json"),
            serde_json::to_vec(&board).unwrap(),
        )
        .unwrap();

        let source = FileBoardSource::new(dir.path());
        source.authenticate().await.expect("authenticate");
        assert_eq!(source.fetch(BoardId(7)).await.unwrap(), board);
    }

    #[tokio::test]
    async fn test_file_source_missing_board() {
        let dir = tempdir().unwrap();
        let source = FileBoardSource::new(dir.path());
        let err = source.fetch(BoardId(9)).await.unwrap_err();
        assert!(matches!(err, SourceError::BoardNotFound(BoardId(9))));
    }

    #[tokio::test]
    async fn test_file_source_missing_dir_fails_auth() {
        let dir = tempdir().unwrap();
        let source = FileBoardSource::new(dir.path().join("nope"));
        assert!(matches!(
            source.authenticate().await,
            Err(SourceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_bad_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("3.json"), b"not json").unwrap();
        let source = FileBoardSource::new(dir.path());
        assert!(matches!(
            source.fetch(BoardId(3)).await,
            Err(SourceError::Json(_))
        ));
    }
}
