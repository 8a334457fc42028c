//! Resolve command - map a document id back to its path.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::Settings;
use crate::types::DocumentId;

pub fn run(id: DocumentId, index: Option<PathBuf>, settings: &Settings) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(index) = index {
        settings.index_path = index;
    }

    let persistence = settings.persistence();
    let paths = persistence.load_path_cache().with_context(|| {
        format!(
            "Unable to load path cache {}",
            persistence.path_cache_path().display()
        )
    })?;

    match paths.resolve(id) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => anyhow::bail!("Unknown document id {id}"),
    }
}
