//! Page text providers.
//!
//! The build pipeline never parses document formats itself. A provider opens a
//! document and hands out the text of individual pages; closing is tied to
//! dropping the returned [`PageSource`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Page separator used by common document-to-text converters.
pub const FORM_FEED: char = '\u{000C}';

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unable to open document {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Unable to read page {page} of {path}: {reason}")]
    Page {
        path: PathBuf,
        page: usize,
        reason: String,
    },
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Opens documents for page-level text extraction.
pub trait PageTextProvider: Send + Sync {
    /// Open a document. The returned source is closed when dropped.
    fn open(&self, path: &Path) -> ProviderResult<Box<dyn PageSource>>;
}

/// An open document.
///
/// Shared by every page worker of one document, hence `Sync`.
pub trait PageSource: Send + Sync {
    /// Path the source was opened from.
    fn path(&self) -> &Path;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text of the zero-based page `index`.
    fn page_text(&self, index: usize) -> ProviderResult<String>;
}

/// Plain UTF-8 text files paginated by form feeds.
///
/// A file without form feeds is a single page. A trailing empty page after a
/// final form feed is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextProvider;

impl PlainTextProvider {
    pub fn new() -> Self {
        Self
    }
}

impl PageTextProvider for PlainTextProvider {
    fn open(&self, path: &Path) -> ProviderResult<Box<dyn PageSource>> {
        let content = fs::read_to_string(path).map_err(|e| ProviderError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(InMemorySource {
            path: path.to_path_buf(),
            pages: split_pages(&content),
        }))
    }
}

/// Split text into pages at form feeds.
pub fn split_pages(content: &str) -> Vec<String> {
    let mut pages: Vec<String> = content.split(FORM_FEED).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Documents held in memory, keyed by path.
///
/// Useful for tests and for embedders that already have page text.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    documents: HashMap<PathBuf, Vec<String>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given pages.
    pub fn with_document<P, I, S>(mut self, path: P, pages: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(path, pages);
        self
    }

    pub fn insert<P, I, S>(&mut self, path: P, pages: I)
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents
            .insert(path.into(), pages.into_iter().map(Into::into).collect());
    }

    /// Paths of every stored document.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.documents.keys().cloned().collect()
    }
}

impl PageTextProvider for MemoryProvider {
    fn open(&self, path: &Path) -> ProviderResult<Box<dyn PageSource>> {
        let pages = self
            .documents
            .get(path)
            .ok_or_else(|| ProviderError::Open {
                path: path.to_path_buf(),
                reason: "no such document".to_string(),
            })?;
        Ok(Box::new(InMemorySource {
            path: path.to_path_buf(),
            pages: pages.clone(),
        }))
    }
}

struct InMemorySource {
    path: PathBuf,
    pages: Vec<String>,
}

impl PageSource for InMemorySource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> ProviderResult<String> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| ProviderError::Page {
                path: self.path.clone(),
                page: index,
                reason: format!("page out of range (document has {})", self.pages.len()),
            })
    }
}
