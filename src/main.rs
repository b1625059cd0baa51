//! maml CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. The JSON response is
//! already on stdout when an error comes back; the error is repeated on
//! stderr and the process exits non-zero.

use maml::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
