//! Tabular exports of a tracker: aligned Markdown and delimited CSV.

use crate::clock::Clock;
use crate::format::{ReportSettings, format_duration, format_timestamp};
use crate::tracker::{EntryId, Tracker};

/// Column headers of the Markdown table.
pub const HEADER: [&str; 4] = ["Segment", "Start time", "End time", "Duration"];

/// One flattened row: name, start, end, duration.
pub type Row = [String; 4];

/// Flattens an entry and all its descendants into rows, in display order.
///
/// Start and end are blank when unset. Duration is blank for a running leaf
/// and shown for ended leaves and containers.
pub fn table_section(
    tracker: &Tracker,
    id: EntryId,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Vec<Row> {
    let mut rows = Vec::new();
    push_section(tracker, id, settings, clock, &mut rows);
    rows
}

fn push_section(
    tracker: &Tracker,
    id: EntryId,
    settings: &ReportSettings,
    clock: &impl Clock,
    rows: &mut Vec<Row>,
) {
    let Some(entry) = tracker.entry(id) else {
        return;
    };
    let timestamp = |t: Option<i64>| t.map(|t| format_timestamp(t, settings)).unwrap_or_default();
    let duration = if entry.end_time.is_some() || entry.is_container() {
        format_duration(tracker.duration(id, clock), settings)
    } else {
        String::new()
    };
    rows.push([
        entry.name.clone(),
        timestamp(entry.start_time),
        timestamp(entry.end_time),
        duration,
    ]);
    for &child in tracker.children(id) {
        push_section(tracker, child, settings, clock, rows);
    }
}

fn all_rows(tracker: &Tracker, settings: &ReportSettings, clock: &impl Clock) -> Vec<Row> {
    tracker
        .entries()
        .iter()
        .flat_map(|&id| table_section(tracker, id, settings, clock))
        .collect()
}

/// Renders the tracker as a Markdown table padded for monospace display.
///
/// The header is followed by a dash separator, then one row per entry, then
/// a bold total row.
pub fn markdown_table(tracker: &Tracker, settings: &ReportSettings, clock: &impl Clock) -> String {
    let mut table: Vec<Row> = vec![HEADER.map(String::from)];
    table.extend(all_rows(tracker, settings, clock));
    let total = format_duration(tracker.total_duration(clock), settings);
    table.push([
        "**Total**".to_string(),
        String::new(),
        String::new(),
        format!("**{total}**"),
    ]);

    let widths: [usize; 4] = std::array::from_fn(|i| {
        table
            .iter()
            .map(|row| row[i].chars().count())
            .max()
            .unwrap_or(0)
    });

    let mut ret = String::new();
    for (r, row) in table.iter().enumerate() {
        if r == 1 {
            let dashes = widths.map(|w| "-".repeat(w));
            push_line(&mut ret, &dashes, &widths);
        }
        push_line(&mut ret, row, &widths);
    }
    ret
}

fn push_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str("| ");
    out.push_str(&padded.join(" | "));
    out.push_str(" |\n");
}

/// Renders the tracker as delimited lines, one per entry.
///
/// There is no header or total row, and fields are not quoted: a name
/// containing the delimiter produces an extra column.
pub fn csv(tracker: &Tracker, settings: &ReportSettings, clock: &impl Clock) -> String {
    let mut ret = String::new();
    for row in all_rows(tracker, settings, clock) {
        ret.push_str(&row.join(&settings.csv_delimiter));
        ret.push('\n');
    }
    ret
}
