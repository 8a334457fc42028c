//! Query engine over a built [`SearchIndex`](crate::types::SearchIndex).
//!
//! A query is normalized (stop words removed, lowercased), tagged to find its
//! keywords and nouns, and then every in-scope page is scored line by line:
//!
//! 1. a line must contain a keyword and a noun (case-sensitive)
//! 2. it is accepted if it contains the whole normalized query, or if its
//!    edit distance to the keywords is below `min(query length, cap)`
//! 3. exact matches score `(query length + line length) / divisor`, the rest
//!    score their distance; lower is better
//!
//! Pages dominated by index-like lines (`Malaria, 112`) are skipped entirely.

pub mod analysis;
pub mod context;
pub mod engine;
pub mod query;
pub mod rank;
pub mod toc;

pub use analysis::{
    EditDistance, EnglishStopwords, Levenshtein, PosTag, RuleTagger, StopwordFilter, TaggedToken,
    Tokenizer,
};
pub use context::line_context;
pub use engine::{SearchEngine, SearchOptions, search};
pub use query::QueryContext;
pub use rank::aggregate;
pub use toc::{DEFAULT_TOC_MIN_LINES, DEFAULT_TOC_MIN_RATIO, DEFAULT_TOC_PATTERN, TocDetector};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Unable to analyze query: {0}")]
    Analysis(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
