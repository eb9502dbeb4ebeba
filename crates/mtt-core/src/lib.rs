//! Core model for Markdown-embedded time trackers.
//!
//! This crate contains:
//! - Tracker: the entry tree engine (start, stop, split, merge, durations)
//! - Schema: forward-compatible loading of stored tracker JSON
//! - Report: Markdown table and CSV exports
//! - Document: locating and rewriting tracker blocks in Markdown text
//! - Refresh: live display ticks with an explicit liveness handle

pub mod clock;
pub mod document;
pub mod format;
pub mod refresh;
pub mod report;
pub mod schema;
mod tracker;

pub use clock::{Clock, FixedClock, SystemClock, Timestamp};
pub use document::{DEFAULT_LANGUAGE, DocumentError, TrackerBlock};
pub use format::{DurationFormat, ReportSettings, TimestampZone, format_duration, format_timestamp};
pub use refresh::{LiveHandle, TickView, refresh_tick};
pub use schema::{MalformedTracker, load_tracker, parse_tracker, to_json};
pub use tracker::{
    EngineError, Entry, EntryId, MANUAL_ENTRY_NAME, OutlineItem, TotalTime, Tracker,
};
