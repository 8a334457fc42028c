//! Extract stage - page text extraction
//!
//! A fixed pool of document workers pulls [`DocumentJob`]s. Each open document
//! gets its own page pool, sized to the smaller of `page_workers` and its page
//! count, fed page indices through a bounded channel. Every page worker sends
//! its [`PageRecord`]s to the shared record channel.
//!
//! A document that cannot be opened, or a page that cannot be read, is logged
//! and counted. Neither stops the build.

use crate::indexing::pipeline::types::{
    BuildProgress, DocumentJob, ExtractCounts, PipelineError, PipelineResult, ProgressFn,
};
use crate::indexing::provider::{PageSource, PageTextProvider};
use crate::types::PageRecord;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Extract stage for page text loading.
pub struct ExtractStage {
    provider: Arc<dyn PageTextProvider>,
    document_workers: usize,
    page_workers: usize,
}

impl ExtractStage {
    /// Create a new extract stage.
    pub fn new(
        provider: Arc<dyn PageTextProvider>,
        document_workers: usize,
        page_workers: usize,
    ) -> Self {
        Self {
            provider,
            document_workers: document_workers.max(1),
            page_workers: page_workers.max(1),
        }
    }

    /// Run the extract stage until the job channel closes.
    ///
    /// `total` is only used for progress events. The record sender is dropped
    /// once every document worker has finished.
    pub fn run(
        &self,
        receiver: Receiver<DocumentJob>,
        sender: Sender<PageRecord>,
        total: usize,
        progress: Option<ProgressFn<'_>>,
    ) -> PipelineResult<ExtractCounts> {
        let completed = AtomicUsize::new(0);

        thread::scope(|s| {
            let handles: Vec<_> = (0..self.document_workers)
                .map(|_| {
                    let receiver = receiver.clone();
                    let sender = sender.clone();
                    let completed = &completed;

                    s.spawn(move || -> PipelineResult<ExtractCounts> {
                        let mut counts = ExtractCounts::default();

                        for job in receiver {
                            let pages = match self.provider.open(&job.path) {
                                Ok(source) => {
                                    counts.documents_opened += 1;
                                    let (ok, failed) =
                                        extract_document(source.as_ref(), self.page_workers, &sender)?;
                                    counts.pages_extracted += ok;
                                    counts.pages_failed += failed;
                                    tracing::debug!(
                                        target: "extract",
                                        "[{}/{}] {}: {} pages",
                                        job.ordinal,
                                        total,
                                        job.path.display(),
                                        ok
                                    );
                                    Some(ok)
                                }
                                Err(e) => {
                                    counts.documents_failed += 1;
                                    tracing::warn!(target: "extract", "Skipping document: {e}");
                                    None
                                }
                            };

                            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            if let Some(report) = progress {
                                report(BuildProgress::Document {
                                    completed: done,
                                    total,
                                    path: &job.path,
                                    pages,
                                });
                            }
                        }

                        Ok(counts)
                    })
                })
                .collect();

            // Workers hold their own clones; the stage's copies must not keep
            // the channels open.
            drop(receiver);
            drop(sender);

            let mut total_counts = ExtractCounts::default();
            let mut first_error = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(counts)) => total_counts.merge(counts),
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(PipelineError::ThreadPanicked("document worker"));
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(total_counts),
            }
        })
    }
}

/// Extract every page of an open document with a dedicated page pool.
///
/// Returns `(pages_extracted, pages_failed)`. Returns once all page workers
/// have finished, so the caller may drop `source` afterwards.
pub fn extract_document(
    source: &dyn PageSource,
    page_workers: usize,
    sender: &Sender<PageRecord>,
) -> PipelineResult<(usize, usize)> {
    let page_count = source.page_count();
    if page_count == 0 {
        return Ok((0, 0));
    }

    let workers = page_workers.clamp(1, page_count);
    let (page_tx, page_rx) = bounded::<usize>(workers * 2);

    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let page_rx = page_rx.clone();
                let sender = sender.clone();

                s.spawn(move || {
                    let mut extracted = 0;
                    let mut failed = 0;

                    for index in page_rx {
                        match source.page_text(index) {
                            Ok(text) => {
                                let record = PageRecord::new(source.path(), index, text);
                                if sender.send(record).is_err() {
                                    // Assembler gone, stop extracting
                                    break;
                                }
                                extracted += 1;
                            }
                            Err(e) => {
                                failed += 1;
                                tracing::warn!(target: "extract", "Skipping page: {e}");
                            }
                        }
                    }

                    (extracted, failed)
                })
            })
            .collect();
        drop(page_rx);

        for index in 0..page_count {
            if page_tx.send(index).is_err() {
                break;
            }
        }
        drop(page_tx);

        let mut extracted = 0;
        let mut failed = 0;
        let mut panicked = false;
        for handle in handles {
            match handle.join() {
                Ok((ok, err)) => {
                    extracted += ok;
                    failed += err;
                }
                Err(_) => panicked = true,
            }
        }

        if panicked {
            Err(PipelineError::ThreadPanicked("page worker"))
        } else {
            Ok((extracted, failed))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::provider::{MemoryProvider, ProviderError, ProviderResult};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Document whose odd pages fail to load.
    struct FlakySource {
        path: PathBuf,
        pages: usize,
    }

    impl PageSource for FlakySource {
        fn path(&self) -> &Path {
            &self.path
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn page_text(&self, index: usize) -> ProviderResult<String> {
            if index % 2 == 1 {
                Err(ProviderError::Page {
                    path: self.path.clone(),
                    page: index,
                    reason: "corrupt".to_string(),
                })
            } else {
                Ok(format!("page {index}"))
            }
        }
    }

    #[test]
    fn test_extract_document_all_pages() {
        let provider = MemoryProvider::new().with_document("/book.txt", ["a", "b", "c", "d", "e"]);
        let source = provider.open(Path::new("/book.txt")).unwrap();
        let (tx, rx) = bounded(16);

        let (ok, failed) = extract_document(source.as_ref(), 3, &tx).unwrap();
        drop(tx);

        let mut pages: Vec<_> = rx.iter().map(|r| (r.page_num, r.text)).collect();
        pages.sort();

        assert_eq!((ok, failed), (5, 0));
        assert_eq!(pages.len(), 5);
        assert_eq!(pages[0], (0, "a".to_string()));
        assert_eq!(pages[4], (4, "e".to_string()));
    }

    #[test]
    fn test_extract_document_skips_bad_pages() {
        let source = FlakySource {
            path: PathBuf::from("/flaky.txt"),
            pages: 6,
        };
        let (tx, rx) = bounded(16);

        let (ok, failed) = extract_document(&source, 4, &tx).unwrap();
        drop(tx);

        assert_eq!((ok, failed), (3, 3));
        assert!(rx.iter().all(|r| r.page_num % 2 == 0));
    }

    #[test]
    fn test_extract_document_more_workers_than_pages() {
        let provider = MemoryProvider::new().with_document("/one.txt", ["only"]);
        let source = provider.open(Path::new("/one.txt")).unwrap();
        let (tx, rx) = bounded(1);

        let (ok, _) = extract_document(source.as_ref(), 64, &tx).unwrap();
        drop(tx);

        assert_eq!(ok, 1);
        assert_eq!(rx.iter().count(), 1);
    }

    #[test]
    fn test_extract_stage_counts_failures() {
        let provider = MemoryProvider::new()
            .with_document("/a.txt", ["a0", "a1"])
            .with_document("/b.txt", ["b0"]);
        let stage = ExtractStage::new(Arc::new(provider), 2, 2);

        let (job_tx, job_rx) = bounded(4);
        let (record_tx, record_rx) = bounded(4);
        for (i, path) in ["/a.txt", "/missing.txt", "/b.txt"].iter().enumerate() {
            job_tx.send(DocumentJob::new(i + 1, *path)).unwrap();
        }
        drop(job_tx);

        let events = Mutex::new(Vec::new());
        let report = |event: BuildProgress<'_>| {
            if let BuildProgress::Document { completed, pages, .. } = event {
                events.lock().unwrap().push((completed, pages));
            }
        };

        // Drain concurrently; the record channel is smaller than the output.
        let collector = thread::spawn(move || record_rx.iter().count());
        let counts = stage.run(job_rx, record_tx, 3, Some(&report)).unwrap();
        let received = collector.join().unwrap();

        assert_eq!(counts.documents_opened, 2);
        assert_eq!(counts.documents_failed, 1);
        assert_eq!(counts.pages_extracted, 3);
        assert_eq!(received, 3);

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().any(|(_, pages)| pages.is_none()));
        assert!(events.iter().any(|(completed, _)| *completed == 3));
    }
}
