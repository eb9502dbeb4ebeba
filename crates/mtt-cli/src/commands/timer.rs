//! Start, stop, and continue commands.

use std::io::Write;

use anyhow::Result;
use mtt_core::{Clock, EntryId, ReportSettings, format_duration};

use super::util::resolve_entry;
use crate::store::TrackerDocument;

/// Starts a new top-level entry.
pub fn start<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    name: Option<&str>,
    clock: &impl Clock,
) -> Result<()> {
    let name = doc.update(|tracker| {
        let id = tracker.start_new_entry(name, clock)?;
        Ok(tracker.entry(id).map(|e| e.name.clone()).unwrap_or_default())
    })?;
    tracing::info!(%name, "started entry");
    writeln!(writer, "Started {name}")?;
    Ok(())
}

/// Stops the running entry.
pub fn stop<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Result<()> {
    let (name, duration, total) = doc.update(|tracker| {
        let id = tracker.end_running_entry(clock)?;
        let name = tracker.entry(id).map(|e| e.name.clone()).unwrap_or_default();
        Ok((name, tracker.duration(id, clock), tracker.total.total_time))
    })?;
    tracing::info!(%name, duration, "stopped entry");
    writeln!(
        writer,
        "Stopped {name} after {} (total {})",
        format_duration(duration, settings),
        format_duration(total, settings)
    )?;
    Ok(())
}

/// Starts a sub-entry under the entry at `path`, splitting it if needed.
pub fn continue_entry<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    path: &str,
    name: Option<&str>,
    clock: &impl Clock,
) -> Result<()> {
    let (parent, child) = doc.update(|tracker| {
        let id = resolve_entry(tracker, path)?;
        let child = tracker.start_sub_entry(id, name, clock)?;
        let name_of = |id: EntryId| tracker.entry(id).map(|e| e.name.clone()).unwrap_or_default();
        Ok((name_of(id), name_of(child)))
    })?;
    tracing::info!(%parent, %child, "started sub-entry");
    writeln!(writer, "Started {child} under {parent}")?;
    Ok(())
}
