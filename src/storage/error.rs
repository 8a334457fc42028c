use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Artifact is empty. Run `folio build-index` to generate it")]
    EmptyArtifact,

    #[error("Artifact is truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("Unrecognized artifact header")]
    BadMagic,

    #[error("Unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Path cache not found at {0}")]
    PathCacheMissing(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the bytes on disk are unusable, as opposed to
    /// the file being unreachable.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::EmptyArtifact
                | Self::Truncated { .. }
                | Self::BadMagic
                | Self::UnsupportedVersion { .. }
                | Self::ChecksumMismatch { .. }
                | Self::Decode(_)
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
