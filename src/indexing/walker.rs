//! File system walker for discovering documents to index
//!
//! Recursively lists regular files under a root whose lowercased extension is
//! accepted. Any entry whose name starts with `.` is skipped, and hidden
//! directories are not descended into. The root itself is never filtered.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walks directories to find documents
#[derive(Debug, Clone)]
pub struct FileWalker {
    extensions: HashSet<String>,
}

impl FileWalker {
    /// Create a walker accepting the given extensions.
    ///
    /// Extensions are matched case-insensitively; a leading `.` is optional.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    /// Walk `root` and return every accepted document path.
    ///
    /// Fails on the first traversal error. No ordering guarantee.
    pub fn walk(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf);
                let err = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("file system loop detected"));
                match path {
                    Some(path) => io::Error::new(err.kind(), format!("{}: {err}", path.display())),
                    None => err,
                }
            })?;

            if entry.file_type().is_file() && self.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }

        tracing::debug!(target: "walker", "Found {} documents under {}", files.len(), root.display());
        Ok(files)
    }

    /// Whether `path` carries an accepted extension.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Convenience wrapper over [`FileWalker::walk`].
pub fn walk_dir<S: AsRef<str>>(root: &Path, extensions: &[S]) -> io::Result<Vec<PathBuf>> {
    FileWalker::new(extensions.iter().map(AsRef::as_ref)).walk(root)
}
