//! Search-file and search-dir commands: scan documents without an index.

use std::path::Path;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::cli::commands::print_matches;
use crate::config::Settings;
use crate::indexing::{PlainTextProvider, search_directory, search_file};

/// Run the search-file command.
pub fn run_file(file: &Path, pattern: &str, json: bool, settings: &Settings) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let matches = search_file(
        &PlainTextProvider::new(),
        file,
        pattern,
        settings.scan.max_concurrency,
        &token,
    )
    .with_context(|| format!("Unable to search {}", file.display()))?;

    print_matches(&matches, json)
}

/// Run the search-dir command.
pub fn run_dir(
    directory: &Path,
    pattern: &str,
    json: bool,
    settings: &Settings,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let matches = search_directory(
        &PlainTextProvider::new(),
        directory,
        &settings.indexing.extensions,
        pattern,
        settings.scan.max_concurrency,
        &token,
    )
    .with_context(|| format!("Unable to search {}", directory.display()))?;

    print_matches(&matches, json)
}
