//! Ad-hoc search straight from documents, without a prebuilt index.
//!
//! Matching is a plain word count: the lowercased pattern is split into words
//! and a line matches if its lowercase form contains at least one of them.
//! The score is the number of words found, so higher is better here.
//!
//! Both entry points honor a [`CancellationToken`], checked before each page
//! and before each match is emitted. A cancelled scan reports
//! [`ScanError::Cancelled`] instead of a partial result.

use crate::indexing::provider::{PageSource, PageTextProvider, ProviderError};
use crate::indexing::walker::FileWalker;
use crate::search::line_context;
use crate::types::Match;
use crossbeam_channel::{Sender, bounded};
use std::path::{Path, PathBuf};
use std::thread::{self, ScopedJoinHandle};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Lines taken on each side of a match for its snippet.
pub const SCAN_CONTEXT_LINES: usize = 5;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Unable to load files at {path}: {source}")]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Open(#[from] ProviderError),

    #[error("Search cancelled")]
    Cancelled,

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Matches found on one page, keyed for deterministic ordering.
type PageHits = (PathBuf, usize, Vec<Match>);

/// Search every page of one document.
///
/// Pages are scanned by at most `max_concurrency` workers. Failing to open the
/// document is an error.
pub fn search_file(
    provider: &dyn PageTextProvider,
    path: &Path,
    pattern: &str,
    max_concurrency: usize,
    token: &CancellationToken,
) -> ScanResult<Vec<Match>> {
    let source = provider.open(path)?;
    let (hit_tx, hit_rx) = bounded::<PageHits>(max_concurrency.max(1) * 2);

    let hits = thread::scope(|s| {
        let collector = s.spawn(move || hit_rx.iter().collect::<Vec<_>>());
        let scanned = scan_document(source.as_ref(), pattern, max_concurrency, token, &hit_tx);
        drop(hit_tx);
        let hits = collector
            .join()
            .map_err(|_| ScanError::ThreadPanicked("COLLECT"))?;
        scanned.map(|()| hits)
    })?;

    finish(hits, token)
}

/// Search every accepted document under `root`.
///
/// Documents are scanned by at most `max_concurrency` workers, each with its
/// own page pool of the same size. Documents that cannot be opened are logged
/// and skipped.
pub fn search_directory<S: AsRef<str>>(
    provider: &dyn PageTextProvider,
    root: &Path,
    extensions: &[S],
    pattern: &str,
    max_concurrency: usize,
    token: &CancellationToken,
) -> ScanResult<Vec<Match>> {
    let files = FileWalker::new(extensions.iter().map(AsRef::as_ref))
        .walk(root)
        .map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
    tracing::info!(target: "scan", "Scanning {} documents under {}", files.len(), root.display());

    let workers = max_concurrency.max(1);
    let (file_tx, file_rx) = bounded::<PathBuf>(workers * 2);
    let (hit_tx, hit_rx) = bounded::<PageHits>(workers * 2);

    let hits = thread::scope(|s| {
        let collector = s.spawn(move || hit_rx.iter().collect::<Vec<_>>());

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let file_rx = file_rx.clone();
                let hit_tx = hit_tx.clone();
                s.spawn(move || -> ScanResult<()> {
                    for path in file_rx {
                        if token.is_cancelled() {
                            break;
                        }
                        match provider.open(&path) {
                            Ok(source) => scan_document(
                                source.as_ref(),
                                pattern,
                                max_concurrency,
                                token,
                                &hit_tx,
                            )?,
                            Err(e) => tracing::warn!(target: "scan", "Skipping document: {e}"),
                        }
                    }
                    Ok(())
                })
            })
            .collect();
        drop(file_rx);
        drop(hit_tx);

        for path in files {
            if token.is_cancelled() || file_tx.send(path).is_err() {
                break;
            }
        }
        drop(file_tx);

        let scanned = join_workers(handles, "DOCUMENT");
        let hits = collector
            .join()
            .map_err(|_| ScanError::ThreadPanicked("COLLECT"))?;
        scanned.map(|()| hits)
    })?;

    finish(hits, token)
}

/// Word-count matches for one page.
///
/// Each distinct line text is reported once per page.
pub fn page_matches(text: &str, pattern: &str, path: &Path, page_num: usize) -> Vec<Match> {
    let pattern = pattern.to_lowercase();
    let words: Vec<&str> = pattern.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let mut matches: Vec<Match> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        let found = words.iter().filter(|w| lower.contains(**w)).count();
        if found == 0 || matches.iter().any(|m| m.text == *line) {
            continue;
        }
        let context = line_context(&lines, i, SCAN_CONTEXT_LINES);
        matches.push(Match::new(path, page_num, *line, context, found as f32));
    }

    matches
}

/// Scan the pages of an open document with a bounded page pool.
fn scan_document(
    source: &dyn PageSource,
    pattern: &str,
    max_concurrency: usize,
    token: &CancellationToken,
    hits: &Sender<PageHits>,
) -> ScanResult<()> {
    let page_count = source.page_count();
    if page_count == 0 {
        return Ok(());
    }

    let workers = max_concurrency.clamp(1, page_count);
    let (page_tx, page_rx) = bounded::<usize>(workers * 2);

    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let page_rx = page_rx.clone();
                let hits = hits.clone();
                s.spawn(move || -> ScanResult<()> {
                    for index in page_rx {
                        if token.is_cancelled() {
                            break;
                        }
                        let text = match source.page_text(index) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::warn!(target: "scan", "Skipping page: {e}");
                                continue;
                            }
                        };

                        let matches = page_matches(&text, pattern, source.path(), index);
                        if matches.is_empty() {
                            continue;
                        }
                        if token.is_cancelled()
                            || hits
                                .send((source.path().to_path_buf(), index, matches))
                                .is_err()
                        {
                            break;
                        }
                    }
                    Ok(())
                })
            })
            .collect();
        drop(page_rx);

        for index in 0..page_count {
            if token.is_cancelled() || page_tx.send(index).is_err() {
                break;
            }
        }
        drop(page_tx);

        join_workers(handles, "PAGE")
    })
}

/// Join every worker, then report the first failure.
///
/// A panicked worker becomes [`ScanError::ThreadPanicked`].
fn join_workers(
    handles: Vec<ScopedJoinHandle<'_, ScanResult<()>>>,
    stage: &'static str,
) -> ScanResult<()> {
    let mut outcome = Ok(());
    for handle in handles {
        let result = handle
            .join()
            .unwrap_or_else(|_| Err(ScanError::ThreadPanicked(stage)));
        if outcome.is_ok() {
            outcome = result;
        }
    }
    outcome
}

/// Order hits deterministically, or report cancellation.
///
/// Pages are ordered by path and page number; matches are then stable-sorted
/// by descending score.
fn finish(mut hits: Vec<PageHits>, token: &CancellationToken) -> ScanResult<Vec<Match>> {
    if token.is_cancelled() {
        tracing::info!(target: "scan", "Scan cancelled");
        return Err(ScanError::Cancelled);
    }

    hits.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
    let mut matches: Vec<Match> = hits.into_iter().flat_map(|(_, _, m)| m).collect();
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(target: "scan", "Scan produced {} matches", matches.len());
    Ok(matches)
}
