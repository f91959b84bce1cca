//! Stdout helpers for one-shot commands

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write one JSON line to `writer`.
pub fn write_json_line<T: Serialize, W: Write>(value: &T, writer: &mut W) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write one JSON line to stdout.
pub fn write_report<T: Serialize>(value: &T) -> CliResult<()> {
    write_json_line(value, &mut io::stdout().lock())
}
