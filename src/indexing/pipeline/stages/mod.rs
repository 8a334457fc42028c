//! Pipeline stages
//!
//! Each stage is a separate module that can be tested independently.

pub mod assemble;
pub mod discover;
pub mod extract;

pub use assemble::{AssembleStage, build_index};
pub use discover::{DiscoverStage, feed_jobs};
pub use extract::{ExtractStage, extract_document};
