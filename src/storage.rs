//! Storage - Local best-score persistence
//!
//! The Classic variant keeps a single best score in a small JSON file
//! under the platform data directory. A missing or corrupt file reads
//! as zero; the next finished run rewrites it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

const DATA_DIR: &str = "highway-rush";
const FILE_NAME: &str = "best_score.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no data directory available")]
    Unavailable,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreFile {
    best_score: u64,
}

/// Result of recording a finished run
#[derive(Debug, Clone, Copy)]
pub struct RecordOutcome {
    /// Best score after the update
    pub best: u64,
    /// Whether this run set it
    pub improved: bool,
}

/// Best-score file handle
#[derive(Debug, Clone)]
pub struct BestScoreStore {
    path: Option<PathBuf>,
}

impl BestScoreStore {
    /// Store under the platform data directory. Falls back to a
    /// disabled store when the platform offers none.
    pub fn open_default() -> Self {
        match dirs::data_dir() {
            Some(dir) => Self::at(dir.join(DATA_DIR).join(FILE_NAME)),
            None => {
                log::warn!("no data directory, best score will not persist");
                Self::disabled()
            }
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// A store that persists nothing; reads as zero.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Current best score. Missing and unreadable files read as zero.
    pub fn best(&self) -> Result<u64, StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::Unavailable)?;
        if !path.exists() {
            return Ok(0);
        }

        let raw = fs::read_to_string(path)?;
        match serde_json::from_str::<BestScoreFile>(&raw) {
            Ok(file) => Ok(file.best_score),
            Err(e) => {
                log::warn!("best score file unreadable, treating as 0: {e}");
                Ok(0)
            }
        }
    }

    /// Fold a finished run into the stored best. The best score only
    /// ever goes up.
    pub fn record(&self, score: u64) -> Result<RecordOutcome, StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::Unavailable)?;
        let current = self.best()?;

        if score <= current {
            return Ok(RecordOutcome { best: current, improved: false });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(&BestScoreFile { best_score: score })?;
        fs::write(path, body)?;
        Ok(RecordOutcome { best: score, improved: true })
    }
}
