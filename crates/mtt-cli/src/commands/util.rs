//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use mtt_core::{EntryId, Tracker};
use regex::Regex;

/// Pre-compiled regex for dotted entry paths like `2.1`.
static ENTRY_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]\d*(\.[1-9]\d*)*$").unwrap());

/// Parse a dotted 1-based entry path such as `3` or `2.1.4`.
pub fn parse_entry_path(s: &str) -> anyhow::Result<Vec<usize>> {
    if !ENTRY_PATH_RE.is_match(s) {
        anyhow::bail!("Invalid entry path: {s}. Use positions from `mtt status`, e.g. 2 or 2.1");
    }
    s.split('.')
        .map(|part| {
            part.parse()
                .with_context(|| format!("entry position too large: {part}"))
        })
        .collect()
}

/// Resolve a dotted entry path against a tracker.
pub fn resolve_entry(tracker: &Tracker, path: &str) -> anyhow::Result<EntryId> {
    let positions = parse_entry_path(path)?;
    tracker
        .resolve_path(&positions)
        .with_context(|| format!("no entry at {path}"))
}

/// Render a 1-based path as `2.1`.
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Fail unless the tracker is in edit mode.
pub fn ensure_editable(tracker: &Tracker) -> anyhow::Result<()> {
    if !tracker.edit_enabled {
        anyhow::bail!("editing is disabled for this tracker; run `mtt edit <FILE> on` first");
    }
    Ok(())
}
