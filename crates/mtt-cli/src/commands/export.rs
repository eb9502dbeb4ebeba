//! Export commands: Markdown table, CSV, and raw stored JSON.

use std::io::Write;

use anyhow::{Context, Result};
use mtt_core::{Clock, ReportSettings, report, to_json};

use crate::store::TrackerDocument;

/// Export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Csv,
    Json,
}

pub fn run<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    format: Format,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Result<()> {
    let tracker = doc.read()?;
    let output = match format {
        Format::Table => report::markdown_table(&tracker, settings, clock),
        Format::Csv => report::csv(&tracker, settings, clock),
        Format::Json => {
            let mut json = to_json(&tracker).context("failed to serialize tracker")?;
            json.push('\n');
            json
        }
    };
    writer.write_all(output.as_bytes())?;
    Ok(())
}
