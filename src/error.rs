//! Crate-level error type for callers that mix subsystems.

use crate::indexing::{PipelineError, ProviderError, ScanError};
use crate::search::SearchError;
use crate::storage::StorageError;
use thiserror::Error;

/// Any error a folio operation can return.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl IndexError {
    /// True when a persisted artifact exists but cannot be trusted.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Storage(e) | Self::Pipeline(PipelineError::Storage(e)) => e.is_corruption(),
            _ => false,
        }
    }
}

pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_subsystem_errors() {
        let err: IndexError = StorageError::BadMagic.into();
        assert!(err.is_corruption());
        assert_eq!(err.to_string(), "Unrecognized artifact header");

        let err: IndexError = ScanError::Cancelled.into();
        assert!(!err.is_corruption());
        assert_eq!(err.to_string(), "Search cancelled");

        let err: IndexError = PipelineError::Storage(StorageError::EmptyArtifact).into();
        assert!(err.is_corruption());
    }
}
