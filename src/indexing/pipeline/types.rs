//! Core types for the index build pipeline
//!
//! Data flowing between stages plus the pipeline's error and statistics types.

use crate::storage::IndexSession;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// A document queued for extraction.
#[derive(Debug, Clone)]
pub struct DocumentJob {
    /// 1-based position in discovery order, for progress messages.
    pub ordinal: usize,
    pub path: PathBuf,
}

impl DocumentJob {
    pub fn new(ordinal: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            ordinal,
            path: path.into(),
        }
    }
}

/// Outcome counters from the EXTRACT stage.
///
/// Per-item failures are counted here instead of being raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractCounts {
    pub documents_opened: usize,
    pub documents_failed: usize,
    pub pages_extracted: usize,
    pub pages_failed: usize,
}

impl ExtractCounts {
    pub fn merge(&mut self, other: ExtractCounts) {
        self.documents_opened += other.documents_opened;
        self.documents_failed += other.documents_failed;
        self.pages_extracted += other.pages_extracted;
        self.pages_failed += other.pages_failed;
    }
}

/// Statistics from a full build.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub documents_found: usize,
    pub documents_opened: usize,
    pub documents_failed: usize,
    /// Documents left out because their path is not valid UTF-8.
    pub documents_skipped: usize,
    pub pages_extracted: usize,
    pub pages_failed: usize,
    pub pages_indexed: usize,
    /// Records dropped because their key was already assembled.
    pub duplicate_pages: usize,
    pub elapsed: Duration,
}

impl BuildStats {
    pub(crate) fn from_counts(documents_found: usize, counts: ExtractCounts) -> Self {
        Self {
            documents_found,
            documents_opened: counts.documents_opened,
            documents_failed: counts.documents_failed,
            pages_extracted: counts.pages_extracted,
            pages_failed: counts.pages_failed,
            ..Self::default()
        }
    }
}

/// Result of [`Pipeline::build`](super::Pipeline::build).
#[derive(Debug)]
pub struct BuildOutput {
    pub session: IndexSession,
    pub stats: BuildStats,
}

/// Progress notifications emitted while building.
#[derive(Debug, Clone)]
pub enum BuildProgress<'a> {
    /// Discovery finished with `total` documents.
    Discovered { total: usize },
    /// A document finished extraction. `pages` is `None` if it could not be opened.
    Document {
        completed: usize,
        total: usize,
        path: &'a Path,
        pages: Option<usize>,
    },
}

/// Callback receiving [`BuildProgress`] events from worker threads.
pub type ProgressFn<'a> = &'a (dyn Fn(BuildProgress<'_>) + Sync);

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unable to load files at {path}: {source}")]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
