//! Page-level text index over a corpus of paginated documents, queried in
//! natural language with part-of-speech guided fuzzy matching.
//!
//! ```ignore
//! use folio::{Pipeline, PlainTextProvider, Settings, search};
//!
//! let settings = Settings::load()?;
//! let pipeline = Pipeline::with_settings(Arc::new(PlainTextProvider::new()), &settings);
//! let output = pipeline.build(Path::new("./books"))?;
//! let matches = search("cause of malaria", &output.session.index, &[])?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod indexing;
pub mod logging;
pub mod search;
pub mod storage;
pub mod types;

pub use config::Settings;
pub use error::{IndexError, IndexResult};
pub use indexing::pipeline::stages::build_index;
pub use indexing::{
    BuildOutput, BuildStats, MemoryProvider, PageTextProvider, Pipeline, PlainTextProvider,
};
pub use search::{SearchEngine, SearchError, search};
pub use storage::{
    IndexPersistence, IndexSession, PathIdentityCache, StorageError, deserialize, serialize,
};
pub use types::{DocumentId, IndexKey, Match, PageRecord, SearchIndex};
