//! Bidirectional mapping between document ids and document paths.
//!
//! Built once per index build from the full file list and persisted next to
//! the index, so ids in search results can be resolved without loading page
//! text. Collisions are not detected: the last path inserted for an id wins.

use crate::storage::codec::{self, PATH_CACHE_MAGIC};
use crate::storage::error::StorageResult;
use crate::types::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct PathIdentityCache {
    hashes: HashMap<DocumentId, PathBuf>,
    paths: HashMap<PathBuf, DocumentId>,
}

/// On-disk shape. Only the forward map is stored; the reverse map is rebuilt.
#[derive(Serialize, Deserialize)]
struct PersistedPathCache {
    hashes: BTreeMap<DocumentId, PathBuf>,
}

impl PathIdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache covering every path in `paths`.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut cache = Self::new();
        for path in paths {
            cache.insert(path.as_ref());
        }
        cache
    }

    /// Register a path and return its id.
    pub fn insert(&mut self, path: &Path) -> DocumentId {
        let id = DocumentId::from_path(path);
        if let Some(previous) = self.hashes.insert(id, path.to_path_buf()) {
            if previous != path {
                tracing::debug!(
                    target: "storage",
                    "path hash collision on {id}: {} replaced by {}",
                    previous.display(),
                    path.display()
                );
                self.paths.remove(&previous);
            }
        }
        self.paths.insert(path.to_path_buf(), id);
        id
    }

    /// Path registered for `id`, if any.
    pub fn resolve(&self, id: DocumentId) -> Option<&Path> {
        self.hashes.get(&id).map(PathBuf::as_path)
    }

    /// Id registered for `path`, if any.
    pub fn id_of(&self, path: &Path) -> Option<DocumentId> {
        self.paths.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &Path)> {
        self.hashes.iter().map(|(id, path)| (*id, path.as_path()))
    }

    pub(crate) fn to_bytes(&self) -> StorageResult<Vec<u8>> {
        let persisted = PersistedPathCache {
            hashes: self
                .hashes
                .iter()
                .map(|(id, path)| (*id, path.clone()))
                .collect(),
        };
        codec::encode(PATH_CACHE_MAGIC, &persisted)
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> StorageResult<Self> {
        let persisted: PersistedPathCache = codec::decode(PATH_CACHE_MAGIC, bytes)?;
        let paths = persisted
            .hashes
            .iter()
            .map(|(id, path)| (path.clone(), *id))
            .collect();
        Ok(Self {
            hashes: persisted.hashes.into_iter().collect(),
            paths,
        })
    }
}
