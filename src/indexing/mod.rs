//! Document discovery, page extraction and index building.

pub mod pipeline;
pub mod provider;
pub mod scan;
pub mod walker;

pub use pipeline::{
    BuildOutput, BuildProgress, BuildStats, Pipeline, PipelineConfig, PipelineError,
    PipelineResult, ProgressFn,
};
pub use provider::{
    MemoryProvider, PageSource, PageTextProvider, PlainTextProvider, ProviderError,
    ProviderResult, split_pages,
};
pub use scan::{ScanError, ScanResult, search_directory, search_file};
pub use walker::{FileWalker, walk_dir};
