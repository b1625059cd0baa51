//! CLI argument definitions using clap
//!
//! Commands:
//! - maml validate <file> [--schema <v>]
//! - maml versions <file>
//! - maml show <file> [--schema <v>]
//! - maml new <out> [--schema <v>] [--defaults] [--records <json>]
//! - maml keys [--schema <v>]
//! - maml normalize <file> <out> [--schema <v>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// maml - validate, inspect and write MAML metadata files
#[derive(Parser, Debug)]
#[command(name = "maml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a file against one schema version
    Validate {
        file: PathBuf,

        /// Schema version (defaults to the configured one)
        #[arg(long)]
        schema: Option<String>,
    },

    /// List every schema version a file satisfies
    Versions { file: PathBuf },

    /// Print a human-readable summary of a file
    Show {
        file: PathBuf,

        /// Schema version; the newest satisfied version when omitted
        #[arg(long)]
        schema: Option<String>,
    },

    /// Write a new draft file
    New {
        out: PathBuf,

        #[arg(long)]
        schema: Option<String>,

        /// Seed placeholders and defaults
        #[arg(long)]
        defaults: bool,

        /// JSON file of sample records to derive fields from
        #[arg(long)]
        records: Option<PathBuf>,
    },

    /// List the keys a schema version recognizes, in canonical order
    Keys {
        #[arg(long)]
        schema: Option<String>,
    },

    /// Rewrite a file in canonical key order
    Normalize {
        file: PathBuf,
        out: PathBuf,

        #[arg(long)]
        schema: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
