//! Insert command for adding an empty tracker block to a document.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::store;

/// Runs the insert command.
pub fn run<W: Write>(writer: &mut W, path: &Path, language: &str) -> Result<()> {
    store::insert_block(path, language)?;
    tracing::info!(path = %path.display(), "inserted tracker block");
    writeln!(writer, "Inserted tracker into {}", path.display())?;
    Ok(())
}
