//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use crate::types::DocumentId;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Page-level text index with fuzzy natural-language search
#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version = env!("CARGO_PKG_VERSION"),
    about = "Index paginated documents and search them in natural language",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Quick Start:\n  \
        $ folio init\n  \
        $ folio build-index -d ./books\n  \
        $ folio search -p \"cause of malaria\""
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .folio/settings.toml with default values
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// Build the page index for a directory of documents
    #[command(name = "build-index")]
    BuildIndex {
        /// Directory to index recursively
        #[arg(short, long)]
        directory: PathBuf,

        /// Index file to write (overrides config)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Documents extracted concurrently (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Search a built index
    Search {
        /// Natural-language query
        #[arg(short, long)]
        pattern: String,

        /// Index file to read (overrides config)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Restrict the search to these document ids (repeatable)
        #[arg(long = "doc", value_name = "ID")]
        docs: Vec<DocumentId>,

        /// Maximum number of results (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search one document directly, without an index
    #[command(name = "search-file")]
    SearchFile {
        /// Document to scan
        #[arg(short, long)]
        file: PathBuf,

        /// Words to look for
        #[arg(short, long)]
        pattern: String,

        /// Output matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search every document under a directory, without an index
    #[command(name = "search-dir")]
    SearchDir {
        /// Directory to scan recursively
        #[arg(short, long)]
        directory: PathBuf,

        /// Words to look for
        #[arg(short, long)]
        pattern: String,

        /// Output matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a document id to its path
    Resolve {
        /// Document id as printed in search results
        id: DocumentId,

        /// Index file whose path cache to read (overrides config)
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "folio", "search", "-p", "malaria parasite", "--doc", "42", "--doc", "7", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                pattern, docs, json, limit, ..
            } => {
                assert_eq!(pattern, "malaria parasite");
                assert_eq!(docs, vec![DocumentId::new(42), DocumentId::new(7)]);
                assert!(json);
                assert!(limit.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_build_index() {
        let cli = Cli::try_parse_from(["folio", "build-index", "-d", "./books", "-w", "4"]).unwrap();
        match cli.command {
            Commands::BuildIndex {
                directory, workers, ..
            } => {
                assert_eq!(directory, PathBuf::from("./books"));
                assert_eq!(workers, Some(4));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_document_id() {
        assert!(Cli::try_parse_from(["folio", "resolve", "not-a-number"]).is_err());
    }
}
