use clap::Parser;
use folio::Settings;
use folio::cli::commands::build::BuildArgs;
use folio::cli::commands::search::SearchArgs;
use folio::cli::commands::{build, init, resolve, scan, search};
use folio::cli::{Cli, Commands};
use folio::logging;

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Using default configuration.");
        Settings::default()
    });
    logging::init_with_config(&settings.logging);

    if let Err(e) = run(cli.command, &settings) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(settings),
        Commands::BuildIndex {
            directory,
            index,
            workers,
            no_progress,
        } => build::run(
            BuildArgs {
                directory,
                index,
                workers,
                progress: !no_progress,
            },
            settings,
        ),
        Commands::Search {
            pattern,
            index,
            docs,
            limit,
            json,
        } => search::run(
            SearchArgs {
                pattern,
                index,
                docs,
                limit,
                json,
            },
            settings,
        ),
        Commands::SearchFile {
            file,
            pattern,
            json,
        } => scan::run_file(&file, &pattern, json, settings),
        Commands::SearchDir {
            directory,
            pattern,
            json,
        } => scan::run_dir(&directory, &pattern, json, settings),
        Commands::Resolve { id, index } => resolve::run(id, index, settings),
    }
}
