//! Discover stage - document listing and job feeding
//!
//! The walk completes before any extraction starts so a traversal error fails
//! the build with nothing half-indexed. Discovered paths are then fed to the
//! EXTRACT stage through a bounded channel.

use crate::indexing::pipeline::types::{DocumentJob, PipelineError, PipelineResult};
use crate::indexing::walker::FileWalker;
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};

/// Discover stage for document listing.
pub struct DiscoverStage {
    root: PathBuf,
    walker: FileWalker,
}

impl DiscoverStage {
    /// Create a new discover stage.
    pub fn new<I, S>(root: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root: root.into(),
            walker: FileWalker::new(extensions),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every accepted document under the root.
    pub fn run(&self) -> PipelineResult<Vec<PathBuf>> {
        self.walker
            .walk(&self.root)
            .map_err(|source| PipelineError::Walk {
                path: self.root.clone(),
                source,
            })
    }
}

/// Send each path as a [`DocumentJob`], numbering them from 1.
///
/// Returns the number of jobs sent. Stops early if the receivers are gone.
/// The sender is dropped on return, which closes the job channel.
pub fn feed_jobs(paths: Vec<PathBuf>, sender: Sender<DocumentJob>) -> usize {
    let mut sent = 0;
    for (i, path) in paths.into_iter().enumerate() {
        if sender.send(DocumentJob::new(i + 1, path)).is_err() {
            break;
        }
        sent += 1;
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_documents() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("one.txt"), "1").unwrap();
        fs::write(root.join("two.txt"), "2").unwrap();
        fs::write(root.join("skip.rs"), "fn main() {}").unwrap();

        let stage = DiscoverStage::new(root, ["txt"]);
        let files = stage.run().unwrap();

        println!("Discovered {} documents", files.len());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_discover_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let stage = DiscoverStage::new(temp_dir.path().join("missing"), ["txt"]);

        match stage.run() {
            Err(PipelineError::Walk { path, .. }) => assert!(path.ends_with("missing")),
            other => panic!("expected walk error, got {other:?}"),
        }
    }

    #[test]
    fn test_feed_jobs_numbers_from_one() {
        let (tx, rx) = bounded(4);
        let sent = feed_jobs(vec!["/a.txt".into(), "/b.txt".into()], tx);
        assert_eq!(sent, 2);

        let jobs: Vec<_> = rx.iter().collect();
        assert_eq!(jobs[0].ordinal, 1);
        assert_eq!(jobs[1].ordinal, 2);
        assert!(jobs[1].path.ends_with("b.txt"));
    }

    #[test]
    fn test_feed_jobs_stops_when_receiver_dropped() {
        let (tx, rx) = bounded(1);
        drop(rx);
        assert_eq!(feed_jobs(vec!["/a.txt".into()], tx), 0);
    }
}
