//! Persisted JSON schema for trackers.
//!
//! Trackers are stored as a single JSON object inside a fenced code block:
//!
//! ```json
//! {"total":{"name":"hello1","totalTime":600},"editEnabled":true,"format":"mm",
//!  "entries":[{"name":"Segment 1","startTime":1000,"endTime":1600,"subEntries":null}]}
//! ```
//!
//! # Evolving the schema
//!
//! Loading goes through [`RawTracker`], where every field is optional, and a
//! single default-fill step produces a fully populated [`Tracker`]. Fields
//! added after the first release (`editEnabled`, `format`) must get a
//! default here; unknown fields are ignored. Numeric times written as
//! floats by older versions are rounded to whole seconds, numeric strings
//! are accepted, and any other stray value in a time or name field is
//! treated as unset so one hand-edit does not discard the whole tracker.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::clock::Timestamp;
use crate::tracker::{Entry, EntryId, TotalTime, Tracker};

/// `editEnabled` when absent from stored JSON.
pub const DEFAULT_EDIT_ENABLED: bool = true;

/// `format` when absent from stored JSON.
pub const DEFAULT_FORMAT: &str = "hh:mm";

/// Stored tracker as read from disk, before defaults are filled in.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTracker {
    #[serde(default)]
    total: Option<TotalTime>,
    #[serde(default)]
    edit_enabled: Option<bool>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    entries: Option<Vec<RawEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default, deserialize_with = "lenient_name")]
    name: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    start_time: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    end_time: Option<Timestamp>,
    #[serde(default)]
    sub_entries: Option<Vec<RawEntry>>,
}

impl From<RawTracker> for Tracker {
    fn from(raw: RawTracker) -> Self {
        let total = raw.total.unwrap_or_else(|| Self::default().total);
        let mut tracker = Self::with_flags(
            total,
            raw.edit_enabled.unwrap_or(DEFAULT_EDIT_ENABLED),
            raw.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        );
        for entry in raw.entries.unwrap_or_default() {
            insert_raw(&mut tracker, None, entry);
        }
        tracker
    }
}

fn insert_raw(tracker: &mut Tracker, parent: Option<EntryId>, raw: RawEntry) {
    // An empty child list is a leaf; containers never keep their own span.
    let children = raw.sub_entries.filter(|c| !c.is_empty());
    let entry = if children.is_some() {
        Entry::leaf(raw.name, None, None)
    } else {
        Entry::leaf(raw.name, raw.start_time, raw.end_time)
    };
    let id = tracker.insert(parent, entry);
    for child in children.into_iter().flatten() {
        insert_raw(tracker, Some(id), child);
    }
}

/// Stored tracker shape written back to disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackerRecord {
    total: TotalTime,
    edit_enabled: bool,
    format: String,
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    name: String,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    sub_entries: Option<Vec<EntryRecord>>,
}

impl From<Tracker> for TrackerRecord {
    fn from(tracker: Tracker) -> Self {
        let entries = record_all(&tracker, tracker.entries());
        Self {
            total: tracker.total,
            edit_enabled: tracker.edit_enabled,
            format: tracker.format,
            entries,
        }
    }
}

fn record_all(tracker: &Tracker, ids: &[EntryId]) -> Vec<EntryRecord> {
    ids.iter()
        .filter_map(|&id| {
            let entry = tracker.entry(id)?;
            Some(EntryRecord {
                name: entry.name.clone(),
                start_time: entry.start_time,
                end_time: entry.end_time,
                sub_entries: entry.sub_entries().map(|c| record_all(tracker, c)),
            })
        })
        .collect()
}

/// Stored text that is not a tracker at all.
#[derive(Debug, Error)]
#[error("stored tracker is malformed: {0}")]
pub struct MalformedTracker(#[from] serde_json::Error);

#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating cast of stored seconds"
)]
fn round_seconds(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

/// Reads a number, or a string holding one, as whole seconds.
fn seconds_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_seconds)),
        Value::String(s) => s.trim().parse().ok().and_then(round_seconds),
        _ => None,
    }
}

/// Accepts integer, float, or numeric-string seconds; anything else is 0.
pub(crate) fn lenient_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(seconds_of(&value).unwrap_or(0))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(seconds_of(&value))
}

/// Accepts any scalar as a name; null and containers become empty.
pub(crate) fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Parses stored tracker JSON. Empty text is a fresh tracker.
pub fn parse_tracker(json: &str) -> Result<Tracker, MalformedTracker> {
    if json.trim().is_empty() {
        return Ok(Tracker::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Parses stored tracker JSON, falling back to a fresh tracker.
///
/// Never fails: empty text yields a fresh tracker silently, malformed text
/// yields a fresh tracker and a warning.
pub fn load_tracker(json: &str) -> Tracker {
    match parse_tracker(json) {
        Ok(tracker) => tracker,
        Err(error) => {
            tracing::warn!(%error, json, "failed to parse tracker, starting fresh");
            Tracker::new()
        }
    }
}

/// Serializes a tracker to its single-line stored form.
pub fn to_json(tracker: &Tracker) -> Result<String, serde_json::Error> {
    serde_json::to_string(tracker)
}
