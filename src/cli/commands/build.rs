//! Build-index command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::indexing::{BuildProgress, BuildStats, Pipeline, PlainTextProvider, ProgressFn};

/// Arguments for the build-index command.
pub struct BuildArgs {
    pub directory: PathBuf,
    pub index: Option<PathBuf>,
    pub workers: Option<usize>,
    pub progress: bool,
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("━━╸"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Run the build-index command.
pub fn run(args: BuildArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(index) = args.index {
        settings.index_path = index;
    }
    if let Some(workers) = args.workers {
        settings.indexing.document_workers = workers;
    }
    let show_progress = args.progress && settings.indexing.show_progress;
    crate::log_event!("cli", "build-index", "{}", args.directory.display());

    let pipeline = Pipeline::with_settings(Arc::new(PlainTextProvider::new()), &settings);
    let persistence = settings.persistence();

    let result = if show_progress {
        let bar = ProgressBar::new(0);
        bar.set_style(progress_style());
        bar.set_prefix("Extracting");

        let report: ProgressFn<'_> = &|event| match event {
            BuildProgress::Discovered { total } => bar.set_length(total as u64),
            BuildProgress::Document {
                completed, path, ..
            } => {
                bar.set_position(completed as u64);
                bar.set_message(file_label(path));
            }
        };
        let output = pipeline.build_with_progress(&args.directory, Some(report));
        bar.finish_with_message("done");
        output
    } else {
        pipeline.build(&args.directory)
    };
    let output =
        result.with_context(|| format!("Unable to index {}", args.directory.display()))?;

    persistence
        .save_session(&output.session)
        .context("Unable to write index")?;

    print_stats(&output.stats);
    println!(
        "Index written to {} ({} documents)",
        style(persistence.index_path().display()).cyan(),
        output.session.paths.len()
    );
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_stats(stats: &BuildStats) {
    println!(
        "Documents: {} found, {} opened, {} failed",
        stats.documents_found, stats.documents_opened, stats.documents_failed
    );
    println!(
        "Pages: {} extracted, {} failed, {} indexed",
        stats.pages_extracted, stats.pages_failed, stats.pages_indexed
    );
    if stats.documents_skipped > 0 {
        println!("Documents skipped (non-UTF-8 path): {}", stats.documents_skipped);
    }
    if stats.duplicate_pages > 0 {
        println!("Duplicate pages ignored: {}", stats.duplicate_pages);
    }
    println!("Elapsed: {:.2?}", stats.elapsed);
}
