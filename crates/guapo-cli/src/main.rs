//! Guapo CLI - tabular ingestion and column transformation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { input, rows, json } => commands::inspect::run(input, rows, json),

        Commands::Apply {
            input,
            script,
            preview,
            output,
        } => commands::apply::run(input, script, preview, output),

        Commands::Search {
            input,
            column,
            query,
        } => commands::search::run(input, column, query),

        Commands::Stats { input, column } => commands::stats::run(input, column),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` enables debug output.
fn init_logging(verbose: bool) {
    let default = if verbose { "guapo=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
