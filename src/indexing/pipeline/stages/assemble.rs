//! Assemble stage - single writer
//!
//! The only consumer of the record channel. Folds page records into the
//! [`SearchIndex`]; when two records share a key the first one received wins.
//! Returns once every sender has been dropped, which only happens after all
//! extraction workers have finished.

use crate::types::{PageRecord, SearchIndex};
use crossbeam_channel::Receiver;

/// Assemble stage for index construction.
#[derive(Debug, Default)]
pub struct AssembleStage {
    index: SearchIndex,
    duplicates: usize,
}

impl AssembleStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the record channel into the index.
    ///
    /// Returns the finished index and the number of duplicate records dropped.
    pub fn run(mut self, receiver: Receiver<PageRecord>) -> (SearchIndex, usize) {
        for record in receiver {
            self.add(record);
        }

        tracing::debug!(
            target: "pipeline",
            "Assembled {} pages ({} duplicates dropped)",
            self.index.len(),
            self.duplicates
        );
        (self.index, self.duplicates)
    }

    /// Add one record. Returns `false` if its key was already present.
    pub fn add(&mut self, record: PageRecord) -> bool {
        let stored = self.index.insert_first(record);
        if !stored {
            self.duplicates += 1;
        }
        stored
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Build an index from records already in memory.
pub fn build_index<I>(records: I) -> SearchIndex
where
    I: IntoIterator<Item = PageRecord>,
{
    SearchIndex::from_records(records)
}
