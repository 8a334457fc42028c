//! Core data types shared by the build pipeline, storage and the query engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Stable 32-bit identity of a document path.
///
/// FNV-1 over the raw path bytes. Not collision resistant: two paths may share
/// an id, in which case the path cache keeps whichever was inserted last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(u32);

impl DocumentId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Hash a path into its document id.
    pub fn from_path(path: &Path) -> Self {
        Self(fnv1_32(path.as_os_str().as_encoded_bytes()))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

fn fnv1_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV32_PRIME) ^ u32::from(*byte)
    })
}

/// Identity of one indexed page: (document path, zero-based page number).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexKey {
    pub filename: PathBuf,
    pub page_num: usize,
}

impl IndexKey {
    pub fn new(filename: impl Into<PathBuf>, page_num: usize) -> Self {
        Self {
            filename: filename.into(),
            page_num,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        DocumentId::from_path(&self.filename)
    }
}

/// Text of a single successfully extracted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub filename: PathBuf,
    pub page_num: usize,
    pub text: String,
}

impl PageRecord {
    pub fn new(filename: impl Into<PathBuf>, page_num: usize, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            page_num,
            text: text.into(),
        }
    }

    pub fn key(&self) -> IndexKey {
        IndexKey::new(self.filename.clone(), self.page_num)
    }
}

/// Mapping from page identity to full page text.
///
/// Read-only once built; enumeration order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex {
    pages: BTreeMap<IndexKey, String>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold page records into an index. The first record seen for a key wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PageRecord>,
    {
        let mut index = Self::new();
        for record in records {
            index.insert_first(record);
        }
        index
    }

    /// Insert a record unless its key is already present.
    ///
    /// Returns `true` if the record was stored.
    pub fn insert_first(&mut self, record: PageRecord) -> bool {
        let PageRecord {
            filename,
            page_num,
            text,
        } = record;
        match self.pages.entry(IndexKey::new(filename, page_num)) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(text);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, key: &IndexKey) -> Option<&str> {
        self.pages.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndexKey, &str)> {
        self.pages.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Distinct document paths present in the index.
    pub fn documents(&self) -> Vec<&Path> {
        let mut docs: Vec<&Path> = self.pages.keys().map(|k| k.filename.as_path()).collect();
        docs.dedup();
        docs
    }
}

/// One accepted line from a query. Lower scores rank higher for index search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: DocumentId,
    pub filename: PathBuf,
    pub base_name: String,
    pub page_num: usize,
    pub text: String,
    pub context: String,
    pub score: f32,
}

impl Match {
    pub fn new(
        filename: &Path,
        page_num: usize,
        text: impl Into<String>,
        context: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            id: DocumentId::from_path(filename),
            filename: filename.to_path_buf(),
            base_name: base_name(filename),
            page_num,
            text: text.into(),
            context: context.into(),
            score,
        }
    }
}

/// Final path component as a display string.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
