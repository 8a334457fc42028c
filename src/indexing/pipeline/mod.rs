//! Parallel index build pipeline
//!
//! Turns a directory of documents into a [`SearchIndex`] plus the
//! [`PathIdentityCache`] that resolves document ids back to paths.
//!
//! ## Architecture
//!
//! ```text
//! DISCOVER → EXTRACT (documents × pages) → ASSEMBLE
//!    │              │                         │
//!    ▼              ▼                         ▼
//! [jobs]        [records]                SearchIndex
//! ```
//!
//! ### Stage Overview
//!
//! - **DISCOVER**: Walks the root, then feeds document jobs
//! - **EXTRACT**: Document pool; each open document runs its own page pool
//! - **ASSEMBLE**: Single writer, first record per key wins
//!
//! Channels are bounded. Each channel closes when its last sender drops, so
//! the assembler only returns after every extraction worker has finished.
//!
//! ## Usage
//!
//! ```ignore
//! use folio::indexing::pipeline::{Pipeline, PipelineConfig};
//! use folio::indexing::PlainTextProvider;
//!
//! let pipeline = Pipeline::new(Arc::new(PlainTextProvider::new()), PipelineConfig::default());
//! let stats = pipeline.index_directory(path, &settings.persistence())?;
//! ```

pub mod config;
pub mod stages;
pub mod types;

pub use config::PipelineConfig;
pub use types::{
    BuildOutput, BuildProgress, BuildStats, DocumentJob, ExtractCounts, PipelineError,
    PipelineResult, ProgressFn,
};

use crate::Settings;
use crate::indexing::provider::PageTextProvider;
use crate::storage::{IndexPersistence, IndexSession, PathIdentityCache};
use crate::types::{PageRecord, SearchIndex};
use crossbeam_channel::bounded;
use stages::{AssembleStage, DiscoverStage, ExtractStage, feed_jobs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// The parallel index build pipeline.
pub struct Pipeline {
    provider: Arc<dyn PageTextProvider>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline reading pages through `provider`.
    pub fn new(provider: Arc<dyn PageTextProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// Create a pipeline with configuration derived from settings.
    pub fn with_settings(provider: Arc<dyn PageTextProvider>, settings: &Settings) -> Self {
        Self::new(provider, PipelineConfig::from_settings(settings))
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build an index of every accepted document under `root`.
    ///
    /// The root is canonicalized first so document ids hash absolute paths.
    /// A traversal error fails the build; unreadable documents and pages do not.
    pub fn build(&self, root: &Path) -> PipelineResult<BuildOutput> {
        self.build_with_progress(root, None)
    }

    /// [`build`](Self::build) with progress events.
    pub fn build_with_progress(
        &self,
        root: &Path,
        progress: Option<ProgressFn<'_>>,
    ) -> PipelineResult<BuildOutput> {
        let root = root.canonicalize().map_err(|source| PipelineError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        let discover = DiscoverStage::new(&root, &self.config.extensions);
        let files = discover.run()?;
        tracing::info!(
            target: "pipeline",
            "Discovered {} documents under {}",
            files.len(),
            root.display()
        );

        self.build_from_paths(files, progress)
    }

    /// Build an index from an explicit document list.
    ///
    /// The path cache covers every listed path, including documents that
    /// later fail to open. Paths that are not valid UTF-8 cannot be persisted,
    /// so they are logged, counted as skipped and left out of the build.
    pub fn build_from_paths(
        &self,
        files: Vec<PathBuf>,
        progress: Option<ProgressFn<'_>>,
    ) -> PipelineResult<BuildOutput> {
        let start = Instant::now();
        let listed = files.len();
        let (files, skipped): (Vec<_>, Vec<_>) =
            files.into_iter().partition(|path| path.to_str().is_some());
        for path in &skipped {
            tracing::warn!(
                target: "pipeline",
                "Skipping document with a non-UTF-8 path: {}",
                path.display()
            );
        }

        let total = files.len();
        if let Some(report) = progress {
            report(BuildProgress::Discovered { total });
        }

        let paths = PathIdentityCache::from_paths(&files);
        let (counts, index, duplicates) = self.run_stages(files, total, progress)?;

        let mut stats = BuildStats::from_counts(listed, counts);
        stats.documents_skipped = skipped.len();
        stats.pages_indexed = index.len();
        stats.duplicate_pages = duplicates;
        stats.elapsed = start.elapsed();

        tracing::info!(
            target: "pipeline",
            "Build complete: documents={} opened={} failed={} skipped={}, pages extracted={} failed={} indexed={} in {:?}",
            stats.documents_found,
            stats.documents_opened,
            stats.documents_failed,
            stats.documents_skipped,
            stats.pages_extracted,
            stats.pages_failed,
            stats.pages_indexed,
            stats.elapsed
        );

        Ok(BuildOutput {
            session: IndexSession::new(index, paths),
            stats,
        })
    }

    /// Extract page records from the given documents without assembling them.
    ///
    /// Record order is unspecified.
    pub fn extract(&self, files: Vec<PathBuf>) -> PipelineResult<(Vec<PageRecord>, ExtractCounts)> {
        let total = files.len();
        let (job_tx, job_rx) = bounded(self.config.path_channel_size);
        let (record_tx, record_rx) = bounded(self.config.record_channel_size);
        let extract = self.extract_stage();

        thread::scope(|s| {
            let feeder = s.spawn(move || feed_jobs(files, job_tx));
            let collector = s.spawn(move || record_rx.iter().collect::<Vec<_>>());

            let counts = extract.run(job_rx, record_tx, total, None);

            feeder
                .join()
                .map_err(|_| PipelineError::ThreadPanicked("DISCOVER"))?;
            let records = collector
                .join()
                .map_err(|_| PipelineError::ThreadPanicked("COLLECT"))?;

            Ok((records, counts?))
        })
    }

    /// Build and persist an index for `root`.
    pub fn index_directory(
        &self,
        root: &Path,
        persistence: &IndexPersistence,
    ) -> PipelineResult<BuildStats> {
        let output = self.build(root)?;
        persistence.save_session(&output.session)?;
        Ok(output.stats)
    }

    fn extract_stage(&self) -> ExtractStage {
        ExtractStage::new(
            Arc::clone(&self.provider),
            self.config.document_workers,
            self.config.page_workers,
        )
    }

    fn run_stages(
        &self,
        files: Vec<PathBuf>,
        total: usize,
        progress: Option<ProgressFn<'_>>,
    ) -> PipelineResult<(ExtractCounts, SearchIndex, usize)> {
        let (job_tx, job_rx) = bounded(self.config.path_channel_size);
        let (record_tx, record_rx) = bounded(self.config.record_channel_size);
        let extract = self.extract_stage();

        thread::scope(|s| {
            // Stage 1: DISCOVER - feed the walked paths
            let feeder = s.spawn(move || feed_jobs(files, job_tx));

            // Stage 3: ASSEMBLE - single writer
            let assembler = s.spawn(move || AssembleStage::new().run(record_rx));

            // Stage 2: EXTRACT - runs on this thread until all workers finish
            let counts = extract.run(job_rx, record_tx, total, progress);

            let fed = feeder
                .join()
                .map_err(|_| PipelineError::ThreadPanicked("DISCOVER"))?;
            let (index, duplicates) = assembler
                .join()
                .map_err(|_| PipelineError::ThreadPanicked("ASSEMBLE"))?;
            let counts = counts?;

            tracing::debug!(target: "pipeline", "Fed {fed} of {total} documents");
            Ok((counts, index, duplicates))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::provider::{MemoryProvider, PlainTextProvider};
    use crate::types::{DocumentId, IndexKey};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn test_config() -> PipelineConfig {
        PipelineConfig::default()
            .with_document_workers(2)
            .with_page_workers(3)
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = Pipeline::new(Arc::new(PlainTextProvider::new()), test_config());
        assert_eq!(pipeline.config().document_workers, 2);
        assert_eq!(pipeline.config().page_workers, 3);
    }

    #[test]
    fn test_build_from_memory_provider() {
        let provider = MemoryProvider::new()
            .with_document("/lib/a.txt", ["alpha zero", "alpha one"])
            .with_document("/lib/b.txt", ["beta zero", "beta one", "beta two"]);
        let files = provider.paths();
        let pipeline = Pipeline::new(Arc::new(provider), test_config());

        let output = pipeline
            .build_from_paths(files, None)
            .expect("build should succeed");

        assert_eq!(output.stats.documents_found, 2);
        assert_eq!(output.stats.pages_indexed, 5);
        assert_eq!(output.stats.duplicate_pages, 0);
        assert_eq!(
            output.session.index.get(&IndexKey::new("/lib/b.txt", 2)),
            Some("beta two")
        );

        let id = DocumentId::from_path(Path::new("/lib/a.txt"));
        assert_eq!(output.session.paths.resolve(id), Some(Path::new("/lib/a.txt")));
    }

    #[test]
    fn test_unreadable_document_is_skipped() {
        let provider = MemoryProvider::new().with_document("/ok.txt", ["fine"]);
        let pipeline = Pipeline::new(Arc::new(provider), test_config());

        let output = pipeline
            .build_from_paths(vec!["/ok.txt".into(), "/gone.txt".into()], None)
            .unwrap();

        assert_eq!(output.stats.documents_opened, 1);
        assert_eq!(output.stats.documents_failed, 1);
        assert_eq!(output.session.index.len(), 1);
        // Every listed path is resolvable, opened or not
        assert_eq!(output.session.paths.len(), 2);
    }

    #[test]
    fn test_duplicate_paths_keep_first_record() {
        let provider = MemoryProvider::new().with_document("/dup.txt", ["one", "two"]);
        let pipeline = Pipeline::new(Arc::new(provider), test_config());

        let output = pipeline
            .build_from_paths(vec!["/dup.txt".into(), "/dup.txt".into()], None)
            .unwrap();

        assert_eq!(output.stats.pages_extracted, 4);
        assert_eq!(output.stats.pages_indexed, 2);
        assert_eq!(output.stats.duplicate_pages, 2);
    }

    #[test]
    fn test_progress_events() {
        let provider = MemoryProvider::new()
            .with_document("/a.txt", ["a"])
            .with_document("/b.txt", ["b"]);
        let files = provider.paths();
        let pipeline = Pipeline::new(Arc::new(provider), test_config());

        let seen = Mutex::new(Vec::new());
        let report = |event: BuildProgress<'_>| {
            let label = match event {
                BuildProgress::Discovered { total } => format!("discovered {total}"),
                BuildProgress::Document { completed, total, .. } => {
                    format!("document {completed}/{total}")
                }
            };
            seen.lock().unwrap().push(label);
        };

        pipeline.build_from_paths(files, Some(&report)).unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.first().map(String::as_str), Some("discovered 2"));
        assert!(seen.contains(&"document 2/2".to_string()));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_extract_returns_records() {
        let provider = MemoryProvider::new().with_document("/x.txt", ["p0", "p1", "p2"]);
        let pipeline = Pipeline::new(Arc::new(provider), test_config());

        let (records, counts) = pipeline.extract(vec!["/x.txt".into()]).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(counts.pages_extracted, 3);
        assert!(records.iter().all(|r| r.filename == Path::new("/x.txt")));
    }

    #[test]
    fn test_index_directory_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let books = temp_dir.path().join("books");
        fs::create_dir_all(books.join("nested")).unwrap();
        fs::write(books.join("one.txt"), "First page\u{c}Second page").unwrap();
        fs::write(books.join("nested/two.txt"), "Only page").unwrap();
        fs::write(books.join("skip.md"), "not indexed").unwrap();

        let persistence = IndexPersistence::new(temp_dir.path().join("index/index.bin"));
        let pipeline = Pipeline::new(Arc::new(PlainTextProvider::new()), test_config());

        let stats = pipeline.index_directory(&books, &persistence).unwrap();
        println!("Build stats: {stats:?}");
        assert_eq!(stats.documents_found, 2);
        assert_eq!(stats.pages_indexed, 3);

        let session = persistence.load().unwrap();
        assert_eq!(session.index.len(), 3);

        let one = books.canonicalize().unwrap().join("one.txt");
        assert_eq!(session.index.get(&IndexKey::new(&one, 1)), Some("Second page"));
        assert_eq!(
            session.paths.resolve(DocumentId::from_path(&one)),
            Some(one.as_path())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_skipped_not_fatal() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let books = temp_dir.path().join("books");
        fs::create_dir_all(&books).unwrap();
        fs::write(books.join("good.txt"), "Readable page").unwrap();
        let bad = books.join(OsStr::from_bytes(b"bad\xff.txt"));
        if fs::write(&bad, "Unnamed page").is_err() {
            // Filesystem refuses non-UTF-8 names
            return;
        }

        let persistence = IndexPersistence::new(temp_dir.path().join("index/index.bin"));
        let pipeline = Pipeline::new(Arc::new(PlainTextProvider::new()), test_config());

        let stats = pipeline.index_directory(&books, &persistence).unwrap();
        assert_eq!(stats.documents_found, 2);
        assert_eq!(stats.documents_skipped, 1);
        assert_eq!(stats.documents_opened, 1);
        assert_eq!(stats.pages_indexed, 1);

        let session = persistence.load().unwrap();
        assert_eq!(session.index.len(), 1);
        assert_eq!(session.paths.len(), 1);
    }

    #[test]
    fn test_missing_root_fails_build() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = Pipeline::new(Arc::new(PlainTextProvider::new()), test_config());

        let result = pipeline.build(&temp_dir.path().join("nope"));
        assert!(matches!(result, Err(PipelineError::Walk { .. })));
    }
}
