//! Status command showing the running entry, totals, and entry outline.

use std::io::Write;

use anyhow::Result;
use mtt_core::{Clock, ReportSettings, Tracker, format_duration};

use super::util::format_path;
use crate::store::TrackerDocument;

pub fn run<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Result<()> {
    let tracker = doc.read()?;
    render(writer, &tracker, settings, clock)
}

fn render<W: Write>(
    writer: &mut W,
    tracker: &Tracker,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Result<()> {
    match tracker.running_entry().and_then(|id| tracker.entry(id)) {
        Some(entry) => {
            let current = tracker.current_duration(clock).unwrap_or_default();
            writeln!(
                writer,
                "Running: {} ({})",
                entry.name,
                format_duration(current, settings)
            )?;
        }
        None => writeln!(writer, "Idle")?,
    }
    writeln!(
        writer,
        "Total: {}",
        format_duration(tracker.total_duration(clock), settings)
    )?;
    writeln!(
        writer,
        "Edit mode: {}",
        if tracker.edit_enabled { "on" } else { "off" }
    )?;

    if tracker.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }

    writeln!(writer, "Entries:")?;
    for item in tracker.outline() {
        let Some(entry) = tracker.entry(item.id) else {
            continue;
        };
        let duration = format_duration(tracker.duration(item.id, clock), settings);
        let state = if entry.is_running() { " (running)" } else { "" };
        writeln!(
            writer,
            "{}{} {} {duration}{state}",
            "  ".repeat(item.depth() + 1),
            format_path(&item.path),
            entry.name,
        )?;
    }

    Ok(())
}
