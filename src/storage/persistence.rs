//! Durable storage for the page index and its companion path cache.
//!
//! Both artifacts are written atomically: bytes go to a temporary file in the
//! destination directory which is then renamed over the target.

use crate::storage::codec::{self, INDEX_MAGIC};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::path_cache::PathIdentityCache;
use crate::types::SearchIndex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default file name of the path cache, written next to the index.
pub const PATH_CACHE_FILENAME: &str = "paths.bin";

/// A loaded index together with the path cache built alongside it.
///
/// Owns the id/path mapping for the lifetime of a query session; nothing in
/// the crate keeps a global copy.
#[derive(Debug, Clone, Default)]
pub struct IndexSession {
    pub index: SearchIndex,
    pub paths: PathIdentityCache,
}

impl IndexSession {
    pub fn new(index: SearchIndex, paths: PathIdentityCache) -> Self {
        Self { index, paths }
    }
}

/// Manages persistence of the index
#[derive(Debug, Clone)]
pub struct IndexPersistence {
    index_path: PathBuf,
    path_cache_filename: String,
}

impl IndexPersistence {
    /// Create a persistence manager for the index file at `index_path`.
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            path_cache_filename: PATH_CACHE_FILENAME.to_string(),
        }
    }

    /// Override the companion file name.
    pub fn with_path_cache_filename(mut self, filename: impl Into<String>) -> Self {
        self.path_cache_filename = filename.into();
        self
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Location of the path cache: same directory as the index file.
    pub fn path_cache_path(&self) -> PathBuf {
        match self.index_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(&self.path_cache_filename),
            _ => PathBuf::from(&self.path_cache_filename),
        }
    }

    /// Write both artifacts.
    #[must_use = "Save errors should be handled to ensure data is persisted"]
    pub fn save(&self, index: &SearchIndex, paths: &PathIdentityCache) -> StorageResult<()> {
        let index_bytes = codec::encode(INDEX_MAGIC, index)?;
        write_atomic(&self.index_path, &index_bytes)?;
        tracing::info!(
            target: "storage",
            "Index written to {} ({} pages, {} bytes)",
            self.index_path.display(),
            index.len(),
            index_bytes.len()
        );

        let cache_path = self.path_cache_path();
        let cache_bytes = paths.to_bytes()?;
        write_atomic(&cache_path, &cache_bytes)?;
        tracing::info!(
            target: "storage",
            "Path cache written to {} ({} paths)",
            cache_path.display(),
            paths.len()
        );
        Ok(())
    }

    /// Write a whole session.
    #[must_use = "Save errors should be handled to ensure data is persisted"]
    pub fn save_session(&self, session: &IndexSession) -> StorageResult<()> {
        self.save(&session.index, &session.paths)
    }

    /// Load the page index only.
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load_index(&self) -> StorageResult<SearchIndex> {
        let bytes = fs::read(&self.index_path).map_err(|e| StorageError::io(&self.index_path, e))?;
        let index: SearchIndex = codec::decode(INDEX_MAGIC, &bytes).inspect_err(|e| {
            tracing::warn!(target: "storage", "Failed to decode {}: {e}", self.index_path.display());
        })?;
        tracing::debug!(target: "storage", "Loaded {} pages from {}", index.len(), self.index_path.display());
        Ok(index)
    }

    /// Load the companion path cache only.
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load_path_cache(&self) -> StorageResult<PathIdentityCache> {
        let cache_path = self.path_cache_path();
        let bytes = match fs::read(&cache_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::PathCacheMissing(cache_path));
            }
            Err(e) => return Err(StorageError::io(cache_path, e)),
        };
        PathIdentityCache::from_bytes(&bytes).inspect_err(|e| {
            tracing::warn!(target: "storage", "Failed to decode {}: {e}", cache_path.display());
        })
    }

    /// Load the index and its path cache.
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load(&self) -> StorageResult<IndexSession> {
        let index = self.load_index()?;
        let paths = self.load_path_cache()?;
        Ok(IndexSession::new(index, paths))
    }

    /// Check that the index file exists and is non-empty. Returns its size.
    pub fn validate(&self) -> StorageResult<u64> {
        let meta =
            fs::metadata(&self.index_path).map_err(|e| StorageError::io(&self.index_path, e))?;
        if meta.len() == 0 {
            return Err(StorageError::EmptyArtifact);
        }
        Ok(meta.len())
    }

    /// Check if an index exists
    pub fn exists(&self) -> bool {
        self.index_path.is_file()
    }
}

/// Encode and atomically write `index` and `paths`.
pub fn serialize(index: &SearchIndex, paths: &PathIdentityCache, out: &Path) -> StorageResult<()> {
    IndexPersistence::new(out).save(index, paths)
}

/// Read and decode the index at `input`.
pub fn deserialize(input: &Path) -> StorageResult<SearchIndex> {
    IndexPersistence::new(input).load_index()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StorageError::io(&dir, e))?;
    tmp.write_all(bytes).map_err(|e| StorageError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentId, IndexKey, PageRecord};
    use tempfile::TempDir;

    fn sample_index() -> SearchIndex {
        SearchIndex::from_records(vec![
            PageRecord::new("/docs/a.txt", 0, "The cause of Malaria is a parasite."),
            PageRecord::new("/docs/a.txt", 1, "Mosquitoes transmit the disease."),
        ])
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().join("index.bin"));
        let paths = PathIdentityCache::from_paths(["/docs/a.txt"]);

        persistence.save(&sample_index(), &paths).unwrap();
        assert!(persistence.exists());
        assert!(temp_dir.path().join(PATH_CACHE_FILENAME).exists());

        let session = persistence.load().unwrap();
        assert_eq!(session.index, sample_index());
        let id = DocumentId::from_path(Path::new("/docs/a.txt"));
        assert_eq!(session.paths.resolve(id), Some(Path::new("/docs/a.txt")));
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("index.bin");
        let paths = PathIdentityCache::new();

        serialize(&sample_index(), &paths, &out).unwrap();
        let smaller = SearchIndex::from_records(vec![PageRecord::new("/b.txt", 0, "only")]);
        serialize(&smaller, &paths, &out).unwrap();

        let loaded = deserialize(&out).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(&IndexKey::new("/b.txt", 0)), Some("only"));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("index.bin");
        fs::write(&out, b"").unwrap();

        let persistence = IndexPersistence::new(&out);
        assert!(matches!(persistence.validate(), Err(StorageError::EmptyArtifact)));
        assert!(matches!(deserialize(&out), Err(StorageError::EmptyArtifact)));
    }

    #[test]
    fn test_missing_path_cache_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("index.bin");
        serialize(&sample_index(), &PathIdentityCache::new(), &out).unwrap();
        fs::remove_file(temp_dir.path().join(PATH_CACHE_FILENAME)).unwrap();

        let persistence = IndexPersistence::new(&out);
        assert!(persistence.load_index().is_ok());
        assert!(matches!(
            persistence.load(),
            Err(StorageError::PathCacheMissing(_))
        ));
    }

    #[test]
    fn test_corrupt_path_cache_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("index.bin");
        serialize(&sample_index(), &PathIdentityCache::new(), &out).unwrap();
        fs::write(temp_dir.path().join(PATH_CACHE_FILENAME), b"garbage").unwrap();

        let err = IndexPersistence::new(&out).load_path_cache().unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_missing_index_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = deserialize(&temp_dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_custom_cache_filename() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = IndexPersistence::new(temp_dir.path().join("nested/index.bin"))
            .with_path_cache_filename("ids.bin");
        persistence
            .save(&sample_index(), &PathIdentityCache::from_paths(["/docs/a.txt"]))
            .unwrap();
        assert!(temp_dir.path().join("nested/ids.bin").exists());
        assert_eq!(persistence.load_path_cache().unwrap().len(), 1);
    }
}
