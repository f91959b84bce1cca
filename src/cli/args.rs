//! CLI argument definitions using clap
//!
//! Commands:
//! - flux-induction serve [--host <host>] [--port <port>] [--database-url <url>]
//! - flux-induction verify [--database-url <url>]

use clap::{Parser, Subcommand};

/// FLUX induction intake service
#[derive(Parser, Debug)]
#[command(name = "flux-induction")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Store location, e.g. `file:./data` or `memory:` (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Open the store, verify every record and exit
    Verify {
        /// Store location (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "flux-induction",
            "serve",
            "--port",
            "8080",
            "--database-url",
            "memory:",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Serve {
                host: None,
                port: Some(8080),
                database_url: Some("memory:".to_string()),
            }
        );
    }

    #[test]
    fn test_verify_without_flags() {
        let cli = Cli::try_parse_from(["flux-induction", "verify"]).unwrap();
        assert_eq!(cli.command, Command::Verify { database_url: None });
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["flux-induction", "serve", "--port", "http"]).is_err());
    }
}
