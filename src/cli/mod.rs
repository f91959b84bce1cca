//! CLI module
//!
//! - serve: run the HTTP intake service
//! - verify: check the store and report its record count

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{resolve_config, run, run_command, serve, verify, VerifyReport};
pub use errors::{CliError, CliErrorCode, CliResult};
