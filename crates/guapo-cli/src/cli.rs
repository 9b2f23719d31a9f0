//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Guapo: ingest delimited text and clean it column by column
#[derive(Parser)]
#[command(name = "guapo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How to read the input file.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Path to the delimited text file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (inferred when omitted)
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Treat the first line as data and number the columns 1..N
    #[arg(long)]
    pub no_header: bool,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the inferred delimiter, column types and the first rows
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Number of rows to show
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an operation script and print the resulting table
    Apply {
        #[command(flatten)]
        input: InputArgs,

        /// JSON file with a list of operations
        #[arg(short, long)]
        script: PathBuf,

        /// Show numeric results without committing them
        #[arg(long)]
        preview: bool,

        /// Write the table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List rows whose cell contains a query (case-insensitive)
    Search {
        #[command(flatten)]
        input: InputArgs,

        /// Column index or name
        #[arg(short, long)]
        column: String,

        /// Text to look for
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Count distinct values of a text column
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Column index or name
        #[arg(short, long)]
        column: String,
    },
}
