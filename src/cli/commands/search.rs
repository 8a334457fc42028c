//! Search command - query a built index.

use std::path::PathBuf;

use anyhow::Context;

use crate::cli::commands::print_matches;
use crate::config::Settings;
use crate::search::SearchEngine;
use crate::types::DocumentId;

/// Arguments for the search command.
pub struct SearchArgs {
    pub pattern: String,
    pub index: Option<PathBuf>,
    pub docs: Vec<DocumentId>,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Run the search command.
///
/// An empty `docs` list searches every document in the index.
pub fn run(args: SearchArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(index) = args.index {
        settings.index_path = index;
    }
    if let Some(limit) = args.limit {
        settings.search.max_results = limit;
    }

    let persistence = settings.persistence();
    if !persistence.exists() {
        anyhow::bail!(
            "No index found at {}. Run 'folio build-index' first.",
            persistence.index_path().display()
        );
    }
    persistence.validate()?;

    let index = persistence
        .load_index()
        .with_context(|| format!("Unable to load {}", persistence.index_path().display()))?;
    let engine = SearchEngine::from_config(&settings.search)?;

    let matches = engine.search(&args.pattern, &index, &args.docs)?;
    if matches.is_empty() && !args.json {
        eprintln!("No matches for '{}'", args.pattern);
        return Ok(());
    }
    print_matches(&matches, args.json)
}
