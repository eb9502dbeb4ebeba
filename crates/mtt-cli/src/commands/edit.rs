//! Edit-mode commands: rename, remove, and toggling edit mode.

use std::io::Write;

use anyhow::Result;
use mtt_core::{Clock, ReportSettings, format_duration};

use super::util::{ensure_editable, resolve_entry};
use crate::cli::EditMode;
use crate::store::TrackerDocument;

/// Renames the entry at `path`.
pub fn rename<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    path: &str,
    name: &str,
) -> Result<()> {
    let renamed = doc.update(|tracker| {
        ensure_editable(tracker)?;
        let id = resolve_entry(tracker, path)?;
        Ok(tracker.rename_entry(id, name)?)
    })?;
    if renamed {
        writeln!(writer, "Renamed {path} to {name}")?;
    } else {
        writeln!(writer, "Name unchanged (empty name given)")?;
    }
    Ok(())
}

/// Removes the entry at `path` and everything under it.
pub fn remove<W: Write>(writer: &mut W, doc: &TrackerDocument, path: &str) -> Result<()> {
    let name = doc.update(|tracker| {
        ensure_editable(tracker)?;
        let id = resolve_entry(tracker, path)?;
        let name = tracker.entry(id).map(|e| e.name.clone()).unwrap_or_default();
        tracker.remove_entry(id);
        Ok(name)
    })?;
    tracing::info!(%name, path, "removed entry");
    writeln!(writer, "Removed {path} ({name})")?;
    Ok(())
}

/// Turns edit mode on or off.
///
/// Leaving edit mode with `total` set forces the tracker total to that many
/// minutes by appending a backdated manual entry.
pub fn set_mode<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    mode: EditMode,
    total: Option<&str>,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Result<()> {
    let adjusted = doc.update(|tracker| match mode {
        EditMode::On => {
            tracker.set_edit_enabled(true);
            Ok(None)
        }
        EditMode::Off => {
            let adjusted = match total {
                Some(total) => {
                    ensure_editable(tracker)?;
                    tracker.adjust_total(total, clock)?;
                    Some(tracker.total.total_time)
                }
                None => None,
            };
            tracker.set_edit_enabled(false);
            Ok(adjusted)
        }
    })?;

    match mode {
        EditMode::On => writeln!(writer, "Edit mode on")?,
        EditMode::Off => writeln!(writer, "Edit mode off")?,
    }
    if let Some(total) = adjusted {
        writeln!(writer, "Total set to {}", format_duration(total, settings))?;
    }
    Ok(())
}
