//! CLI module for maml
//!
//! Provides command-line interface for:
//! - validate: check a file against one schema version
//! - versions: list the versions a file satisfies
//! - show: print a summary
//! - new: write a draft file
//! - keys: list a version's keys
//! - normalize: rewrite a file in canonical order

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{keys, new_draft, normalize, run, run_command, show, validate, versions, Session};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
