//! CLI command implementations
//!
//! Configuration for every command is resolved the same way: defaults, then
//! the environment, then flags.

use serde::Serialize;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::{verify_records, StoreLocation};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_report;

/// Output of `verify`
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub ok: bool,
    pub location: String,
    pub records: usize,
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            host,
            port,
            database_url,
        } => {
            let config = resolve_config(HttpServerConfig::from_env()?, host, port, database_url);
            serve(config)
        }
        Command::Verify { database_url } => {
            let config = resolve_config(HttpServerConfig::from_env()?, None, None, database_url);
            let report = verify(&config.database_url)?;
            write_report(&report)
        }
    }
}

/// Applies command-line overrides on top of `base`.
pub fn resolve_config(
    base: HttpServerConfig,
    host: Option<String>,
    port: Option<u16>,
    database_url: Option<String>,
) -> HttpServerConfig {
    HttpServerConfig {
        host: host.unwrap_or(base.host),
        port: port.unwrap_or(base.port),
        database_url: database_url.unwrap_or(base.database_url),
        cors_origins: base.cors_origins,
    }
}

/// Run the HTTP server until Ctrl-C
pub fn serve(config: HttpServerConfig) -> CliResult<()> {
    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Verify every record at `database_url`. Read-only.
pub fn verify(database_url: &str) -> CliResult<VerifyReport> {
    let location = StoreLocation::parse(database_url)?;
    let records = verify_records(&location)?;
    Ok(VerifyReport {
        ok: true,
        location: location.to_string(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;

    #[test]
    fn test_flags_override_environment() {
        let base = HttpServerConfig {
            port: 9000,
            database_url: "file:/srv/flux".to_string(),
            ..Default::default()
        };
        let config = resolve_config(base, None, Some(8080), None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "file:/srv/flux");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_verify_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file:{}", dir.path().display());
        let report = verify(&url).unwrap();
        assert!(report.ok);
        assert_eq!(report.records, 0);
    }

    #[test]
    fn test_verify_leaves_missing_directory_alone() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let report = verify(&format!("file:{}", data.display())).unwrap();
        assert_eq!(report.records, 0);
        assert_eq!(report.location, format!("file:{}", data.display()));
        assert!(!data.exists());
    }

    #[test]
    fn test_verify_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            crate::storage::StorageWriter::storage_path(dir.path()),
            b"not a record file",
        )
        .unwrap();
        let err = verify(&format!("file:{}", dir.path().display())).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::StoreError);
    }

    #[test]
    fn test_verify_rejects_unknown_scheme() {
        let err = verify("postgres://localhost/flux").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::StoreError);
    }
}
