//! flux-induction entry point
//!
//! Parses arguments and dispatches via `cli::run`. Errors go to stderr with
//! a non-zero exit code.

use flux_induction::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
