//! Entry tree engine.
//!
//! A [`Tracker`] owns a forest of [`Entry`] nodes stored in an arena and
//! addressed by [`EntryId`]. Leaves carry a start/end span; containers carry
//! ordered children and derive their duration from them. At most one leaf in
//! the forest has no end time: the running entry.
//!
//! # State
//!
//! A tracker is either idle (no running entry) or running (exactly one). The
//! operations that create a running leaf ([`Tracker::start_new_entry`],
//! [`Tracker::start_sub_entry`]) and [`Tracker::adjust_total`] require idle;
//! [`Tracker::end_running_entry`] requires running. Violations return an
//! [`EngineError`] and leave the tree untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{Clock, Timestamp};

/// Name given to the synthesized entry created by [`Tracker::adjust_total`].
pub const MANUAL_ENTRY_NAME: &str = "Manual";

/// Precondition violations reported by engine mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An entry is already running, so no new running leaf may be created.
    #[error("an entry is already running")]
    AlreadyRunning,
    /// The operation needs a running entry but the tracker is idle.
    #[error("no entry is running")]
    NotRunning,
    /// The addressed entry is not part of this tracker.
    #[error("entry {0} does not exist")]
    EntryNotFound(EntryId),
    /// The desired total was empty or not a number of minutes.
    #[error("invalid total time {input:?}: expected a number of minutes")]
    InvalidTotal { input: String },
}

/// Stable handle to an entry in a tracker's arena.
///
/// Ids are never reused, so a handle to a removed entry stays dangling
/// rather than aliasing a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named span of time, or a container of child spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display label.
    pub name: String,
    /// Start of the span. Always `None` for containers.
    pub start_time: Option<Timestamp>,
    /// End of the span. `None` on a leaf means the entry is running.
    pub end_time: Option<Timestamp>,
    sub_entries: Option<Vec<EntryId>>,
}

impl Entry {
    pub(crate) fn leaf(
        name: impl Into<String>,
        start_time: Option<Timestamp>,
        end_time: Option<Timestamp>,
    ) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
            sub_entries: None,
        }
    }

    /// Returns true if this entry has children.
    pub const fn is_container(&self) -> bool {
        self.sub_entries.is_some()
    }

    /// Returns true if this is a leaf without an end time.
    pub const fn is_running(&self) -> bool {
        self.sub_entries.is_none() && self.end_time.is_none()
    }

    /// Child ids in creation order, or `None` for a leaf.
    pub fn sub_entries(&self) -> Option<&[EntryId]> {
        self.sub_entries.as_deref()
    }
}

/// Cached snapshot of the tracker's total duration.
///
/// Not authoritative: [`Tracker::total_duration`] always recomputes from
/// the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalTime {
    #[serde(default, deserialize_with = "crate::schema::lenient_name")]
    pub name: String,
    /// Seconds.
    #[serde(default, deserialize_with = "crate::schema::lenient_seconds")]
    pub total_time: i64,
}

/// One row of [`Tracker::outline`]: an entry with its display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub id: EntryId,
    /// 1-based position at each level, root first.
    pub path: Vec<usize>,
}

impl OutlineItem {
    /// Nesting depth, zero for top-level entries.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// The root aggregate: entry forest, cached total, and mode flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "crate::schema::TrackerRecord",
    from = "crate::schema::RawTracker"
)]
pub struct Tracker {
    pub total: TotalTime,
    /// Gates destructive and edit operations in the UI layer.
    pub edit_enabled: bool,
    /// Display-format selector, persisted as-is.
    pub format: String,
    roots: Vec<EntryId>,
    arena: Vec<Option<Entry>>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::with_flags(
            TotalTime {
                name: "hello1".to_string(),
                total_time: 0,
            },
            true,
            "mm".to_string(),
        )
    }
}

impl Tracker {
    /// Creates an empty tracker with default flags.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn with_flags(total: TotalTime, edit_enabled: bool, format: String) -> Self {
        Self {
            total,
            edit_enabled,
            format,
            roots: Vec::new(),
            arena: Vec::new(),
        }
    }

    // ========== Arena Access ==========

    /// Top-level entry ids in order.
    pub fn entries(&self) -> &[EntryId] {
        &self.roots
    }

    /// Looks up an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    /// Child ids of `id`, empty for leaves and unknown ids.
    pub fn children(&self, id: EntryId) -> &[EntryId] {
        self.entry(id).and_then(Entry::sub_entries).unwrap_or(&[])
    }

    /// Number of live entries in the forest.
    pub fn len(&self) -> usize {
        self.arena.iter().flatten().count()
    }

    /// Returns true if the forest has no entries.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.arena.get_mut(id.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, entry: Entry) -> EntryId {
        self.arena.push(Some(entry));
        EntryId(self.arena.len() - 1)
    }

    /// Appends `entry` under `parent`, or at the top level.
    ///
    /// A leaf parent becomes a container; its own span is not migrated.
    pub(crate) fn insert(&mut self, parent: Option<EntryId>, entry: Entry) -> EntryId {
        let id = self.alloc(entry);
        match parent.and_then(|p| self.entry_mut(p)) {
            Some(parent) => parent.sub_entries.get_or_insert_with(Vec::new).push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Drops `id` and its whole subtree from the arena.
    fn release(&mut self, id: EntryId) {
        let Some(entry) = self.arena.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        for child in entry.sub_entries.unwrap_or_default() {
            self.release(child);
        }
    }

    // ========== Running State ==========

    /// Returns true if a running entry exists anywhere in the forest.
    pub fn is_running(&self) -> bool {
        self.running_entry().is_some()
    }

    /// Finds the running leaf, depth first in display order.
    pub fn running_entry(&self) -> Option<EntryId> {
        self.find_running(&self.roots)
    }

    fn find_running(&self, ids: &[EntryId]) -> Option<EntryId> {
        ids.iter().find_map(|&id| {
            let entry = self.entry(id)?;
            match entry.sub_entries() {
                Some(children) => self.find_running(children),
                None if entry.end_time.is_none() => Some(id),
                None => None,
            }
        })
    }

    // ========== Mutations ==========

    /// Appends a running top-level entry named `name` or `Segment N`.
    pub fn start_new_entry(
        &mut self,
        name: Option<&str>,
        clock: &impl Clock,
    ) -> Result<EntryId, EngineError> {
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }
        let name = match name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("Segment {}", self.roots.len() + 1),
        };
        let id = self.insert(None, Entry::leaf(name, Some(clock.now()), None));
        tracing::debug!(%id, "started entry");
        Ok(id)
    }

    /// Stops the running entry and refreshes the cached total.
    pub fn end_running_entry(&mut self, clock: &impl Clock) -> Result<EntryId, EngineError> {
        let id = self.running_entry().ok_or(EngineError::NotRunning)?;
        let now = clock.now();
        if let Some(entry) = self.entry_mut(id) {
            entry.end_time = Some(now);
        }
        self.total.total_time = self.duration_of(&self.roots, now);
        tracing::debug!(%id, total = self.total.total_time, "ended entry");
        Ok(id)
    }

    /// Starts a running child under `id`, splitting it first if it is a leaf.
    ///
    /// Splitting moves the leaf's span into a synthesized `Part 1` child and
    /// clears the parent's own timestamps, so the total is unchanged.
    pub fn start_sub_entry(
        &mut self,
        id: EntryId,
        name: Option<&str>,
        clock: &impl Clock,
    ) -> Result<EntryId, EngineError> {
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }
        let entry = self.entry(id).ok_or(EngineError::EntryNotFound(id))?;
        if !entry.is_container() {
            let part = Entry::leaf("Part 1", entry.start_time, entry.end_time);
            let part = self.alloc(part);
            if let Some(entry) = self.entry_mut(id) {
                entry.sub_entries = Some(vec![part]);
                entry.start_time = None;
                entry.end_time = None;
            }
        }

        let name = match name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("Part {}", self.children(id).len() + 1),
        };
        let child = self.insert(Some(id), Entry::leaf(name, Some(clock.now()), None));
        tracing::debug!(parent = %id, %child, "started sub-entry");
        Ok(child)
    }

    /// Removes `target` and its subtree from wherever it sits in the forest.
    ///
    /// A container left with a single child collapses back into a leaf
    /// carrying that child's span. Returns false if `target` is not found.
    pub fn remove_entry(&mut self, target: EntryId) -> bool {
        if let Some(pos) = self.roots.iter().position(|&id| id == target) {
            self.roots.remove(pos);
            self.release(target);
            return true;
        }
        let roots = self.roots.clone();
        roots
            .into_iter()
            .any(|root| self.remove_within(root, target))
    }

    fn remove_within(&mut self, parent: EntryId, target: EntryId) -> bool {
        let children = self.children(parent).to_vec();
        if let Some(pos) = children.iter().position(|&id| id == target) {
            if let Some(list) = self.entry_mut(parent).and_then(|e| e.sub_entries.as_mut()) {
                list.remove(pos);
            }
            self.release(target);
            self.collapse_single_child(parent);
            return true;
        }
        children
            .into_iter()
            .any(|child| self.remove_within(child, target))
    }

    fn collapse_single_child(&mut self, parent: EntryId) {
        let only = match self.children(parent) {
            [only] => *only,
            _ => return,
        };
        let Some(child) = self.arena.get_mut(only.0).and_then(Option::take) else {
            return;
        };
        let Some(entry) = self.entry_mut(parent) else {
            return;
        };
        if child.sub_entries.is_some() {
            // A container child has no span of its own; adopt its children.
            entry.sub_entries = child.sub_entries;
            entry.start_time = None;
            entry.end_time = None;
        } else {
            entry.start_time = child.start_time;
            entry.end_time = child.end_time;
            entry.sub_entries = None;
        }
    }

    /// Renames an entry. Empty names are ignored and return `Ok(false)`.
    pub fn rename_entry(&mut self, id: EntryId, name: &str) -> Result<bool, EngineError> {
        let entry = self.entry_mut(id).ok_or(EngineError::EntryNotFound(id))?;
        if name.is_empty() {
            return Ok(false);
        }
        entry.name = name.to_string();
        Ok(true)
    }

    /// Sets the edit-mode flag and returns the new value.
    pub const fn set_edit_enabled(&mut self, enabled: bool) -> bool {
        self.edit_enabled = enabled;
        enabled
    }

    /// Forces the total to `desired_minutes` by appending a backdated
    /// `Manual` entry whose span is the difference.
    ///
    /// The input is the raw text the user typed; empty or non-numeric input
    /// is rejected, as is a total whose backdated start would fall outside
    /// the representable calendar range. The delta may be negative, producing
    /// an entry that ends before it starts.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "saturating cast, out-of-range starts are rejected"
    )]
    pub fn adjust_total(
        &mut self,
        desired_minutes: &str,
        clock: &impl Clock,
    ) -> Result<EntryId, EngineError> {
        let input = desired_minutes.trim();
        let invalid = || EngineError::InvalidTotal {
            input: desired_minutes.to_string(),
        };
        if input.is_empty() {
            return Err(invalid());
        }
        let minutes: f64 = input.parse().map_err(|_| invalid())?;
        if !minutes.is_finite() {
            return Err(invalid());
        }
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }

        let now = clock.now();
        let current = self.duration_of(&self.roots, now);
        // Saturates for huge inputs; the range check below rejects those.
        let delta = (minutes * 60.0 - current as f64).round() as i64;
        let start = now
            .checked_sub(delta)
            .filter(|&start| DateTime::<Utc>::from_timestamp(start, 0).is_some())
            .ok_or_else(invalid)?;
        let id = self.insert(
            None,
            Entry::leaf(MANUAL_ENTRY_NAME, Some(start), Some(now)),
        );
        self.total.total_time = self.duration_of(&self.roots, now);
        tracing::debug!(current, delta, total = self.total.total_time, "adjusted total");
        Ok(id)
    }

    /// Recomputes the cached total from the tree.
    pub fn refresh_total(&mut self, clock: &impl Clock) {
        self.total.total_time = self.total_duration(clock);
    }

    // ========== Durations ==========

    /// Live duration of one entry in seconds.
    ///
    /// Containers sum their children; running leaves count up to now.
    pub fn duration(&self, id: EntryId, clock: &impl Clock) -> i64 {
        self.duration_at(id, clock.now())
    }

    /// Live duration of the whole forest in seconds.
    pub fn total_duration(&self, clock: &impl Clock) -> i64 {
        self.duration_of(&self.roots, clock.now())
    }

    /// Live duration of the running entry, if any.
    pub fn current_duration(&self, clock: &impl Clock) -> Option<i64> {
        self.running_entry().map(|id| self.duration(id, clock))
    }

    fn duration_at(&self, id: EntryId, now: Timestamp) -> i64 {
        let Some(entry) = self.entry(id) else {
            return 0;
        };
        match entry.sub_entries() {
            Some(children) => self.duration_of(children, now),
            None => {
                let end = entry.end_time.unwrap_or(now);
                entry.start_time.map_or(0, |start| end.saturating_sub(start))
            }
        }
    }

    /// Sums saturate so hand-edited timestamps cannot overflow.
    pub(crate) fn duration_of(&self, ids: &[EntryId], now: Timestamp) -> i64 {
        ids.iter()
            .fold(0, |sum: i64, &id| sum.saturating_add(self.duration_at(id, now)))
    }

    // ========== Addressing ==========

    /// Resolves a 1-based display path such as `[2, 1]` to an entry id.
    pub fn resolve_path(&self, path: &[usize]) -> Option<EntryId> {
        let (first, rest) = path.split_first()?;
        let mut id = *self.roots.get(first.checked_sub(1)?)?;
        for &pos in rest {
            id = *self.children(id).get(pos.checked_sub(1)?)?;
        }
        Some(id)
    }

    /// Every entry in display order with its 1-based path.
    pub fn outline(&self) -> Vec<OutlineItem> {
        let mut items = Vec::with_capacity(self.len());
        self.outline_into(&self.roots, &mut Vec::new(), &mut items);
        items
    }

    fn outline_into(&self, ids: &[EntryId], prefix: &mut Vec<usize>, out: &mut Vec<OutlineItem>) {
        for (i, &id) in ids.iter().enumerate() {
            prefix.push(i + 1);
            out.push(OutlineItem {
                id,
                path: prefix.clone(),
            });
            self.outline_into(self.children(id), prefix, out);
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const T0: FixedClock = FixedClock(1_000);

    fn leaf(tracker: &mut Tracker, name: &str, start: i64, end: Option<i64>) -> EntryId {
        tracker.insert(None, Entry::leaf(name, Some(start), end))
    }

    /// Every leaf without an end time, for invariant checks.
    fn open_leaves(tracker: &Tracker) -> usize {
        tracker
            .outline()
            .iter()
            .filter(|item| tracker.entry(item.id).is_some_and(Entry::is_running))
            .count()
    }

    // ========== Running State Tests ==========

    #[test]
    fn empty_tracker_is_idle() {
        let tracker = Tracker::new();
        assert!(!tracker.is_running());
        assert_eq!(tracker.running_entry(), None);
    }

    #[test]
    fn running_entry_found_inside_container() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(100));
        let b = tracker.start_sub_entry(a, None, &T0).unwrap();

        assert!(tracker.is_running());
        assert_eq!(tracker.running_entry(), Some(b));
        assert!(tracker.entry(a).unwrap().is_container());
        assert_eq!(open_leaves(&tracker), 1);
    }

    // ========== Start / Stop Tests ==========

    #[test]
    fn start_uses_segment_default_names() {
        let mut tracker = Tracker::new();
        let first = tracker.start_new_entry(None, &T0).unwrap();
        tracker.end_running_entry(&T0.advanced(10)).unwrap();
        let second = tracker.start_new_entry(Some(""), &T0.advanced(20)).unwrap();
        tracker.end_running_entry(&T0.advanced(30)).unwrap();
        let third = tracker.start_new_entry(Some("Review"), &T0.advanced(40)).unwrap();

        assert_eq!(tracker.entry(first).unwrap().name, "Segment 1");
        assert_eq!(tracker.entry(second).unwrap().name, "Segment 2");
        assert_eq!(tracker.entry(third).unwrap().name, "Review");
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut tracker = Tracker::new();
        tracker.start_new_entry(None, &T0).unwrap();
        let before = tracker.clone();

        assert_eq!(
            tracker.start_new_entry(None, &T0.advanced(5)),
            Err(EngineError::AlreadyRunning)
        );
        assert_eq!(tracker, before);
    }

    #[test]
    fn stop_while_idle_is_rejected() {
        let mut tracker = Tracker::new();
        assert_eq!(tracker.end_running_entry(&T0), Err(EngineError::NotRunning));
    }

    #[test]
    fn start_then_stop_duration_matches_span() {
        let mut tracker = Tracker::new();
        let id = tracker.start_new_entry(None, &T0).unwrap();
        tracker.end_running_entry(&T0.advanced(90)).unwrap();

        let entry = tracker.entry(id).unwrap();
        let span = entry.end_time.unwrap() - entry.start_time.unwrap();
        assert_eq!(tracker.duration(id, &T0.advanced(500)), span);
        assert_eq!(span, 90);
        assert_eq!(tracker.total.total_time, 90);
        assert!(!tracker.is_running());
    }

    #[test]
    fn running_duration_is_live() {
        let mut tracker = Tracker::new();
        let id = tracker.start_new_entry(None, &T0).unwrap();

        assert_eq!(tracker.duration(id, &T0.advanced(30)), 30);
        assert_eq!(tracker.duration(id, &T0.advanced(45)), 45);
        assert_eq!(tracker.current_duration(&T0.advanced(45)), Some(45));
        // Queries never touch the cached snapshot.
        assert_eq!(tracker.total.total_time, 0);
    }

    // ========== Split Tests ==========

    #[test]
    fn split_preserves_total_duration() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 200, Some(800));
        leaf(&mut tracker, "B", 900, Some(950));
        let now = FixedClock(2_000);
        let before = tracker.total_duration(&now);

        tracker.start_sub_entry(a, None, &now).unwrap();

        assert_eq!(tracker.total_duration(&now), before);
        let parent = tracker.entry(a).unwrap();
        assert_eq!(parent.start_time, None);
        assert_eq!(parent.end_time, None);

        let [part1, part2] = tracker.children(a) else {
            panic!("expected two children");
        };
        let part1 = tracker.entry(*part1).unwrap();
        assert_eq!(part1.name, "Part 1");
        assert_eq!((part1.start_time, part1.end_time), (Some(200), Some(800)));
        let part2 = tracker.entry(*part2).unwrap();
        assert_eq!(part2.name, "Part 2");
        assert!(part2.is_running());
    }

    #[test]
    fn split_existing_container_appends_part() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        tracker.start_sub_entry(a, None, &FixedClock(20)).unwrap();
        tracker.end_running_entry(&FixedClock(30)).unwrap();
        let third = tracker.start_sub_entry(a, Some("Fixups"), &FixedClock(40)).unwrap();
        tracker.end_running_entry(&FixedClock(45)).unwrap();

        assert_eq!(tracker.children(a).len(), 3);
        assert_eq!(tracker.entry(third).unwrap().name, "Fixups");
        assert_eq!(tracker.duration(a, &FixedClock(100)), 10 + 10 + 5);
    }

    #[test]
    fn split_while_running_is_rejected() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        tracker.start_new_entry(None, &T0).unwrap();
        let before = tracker.clone();

        assert_eq!(
            tracker.start_sub_entry(a, None, &T0),
            Err(EngineError::AlreadyRunning)
        );
        assert_eq!(tracker, before);
    }

    #[test]
    fn split_unknown_entry_is_rejected() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        tracker.remove_entry(a);

        assert_eq!(
            tracker.start_sub_entry(a, None, &T0),
            Err(EngineError::EntryNotFound(a))
        );
    }

    // ========== Remove Tests ==========

    #[test]
    fn removing_second_to_last_child_collapses_container() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        let part2 = tracker.start_sub_entry(a, None, &FixedClock(50)).unwrap();
        tracker.end_running_entry(&FixedClock(80)).unwrap();
        let part1 = tracker.children(a)[0];

        assert!(tracker.remove_entry(part1));

        let entry = tracker.entry(a).unwrap();
        assert!(!entry.is_container());
        assert_eq!((entry.start_time, entry.end_time), (Some(50), Some(80)));
        assert_eq!(entry.name, "A");
        assert_eq!(tracker.entry(part2), None);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn collapse_onto_container_child_adopts_grandchildren() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        tracker.start_sub_entry(a, None, &FixedClock(20)).unwrap();
        tracker.end_running_entry(&FixedClock(30)).unwrap();
        let [part1, part2] = *tracker.children(a) else {
            panic!("expected two children");
        };
        tracker.start_sub_entry(part2, None, &FixedClock(40)).unwrap();
        tracker.end_running_entry(&FixedClock(55)).unwrap();
        let grandchildren = tracker.children(part2).to_vec();

        assert!(tracker.remove_entry(part1));

        assert_eq!(tracker.children(a), grandchildren.as_slice());
        assert_eq!(tracker.duration(a, &FixedClock(100)), 10 + 15);
        assert!(!tracker.is_running());
    }

    #[test]
    fn removing_top_level_entry_does_not_collapse() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        let b = leaf(&mut tracker, "B", 10, Some(20));

        assert!(tracker.remove_entry(a));
        assert_eq!(tracker.entries(), &[b]);
    }

    #[test]
    fn removing_missing_entry_leaves_tree_unchanged() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        tracker.start_sub_entry(a, None, &FixedClock(20)).unwrap();
        let gone = leaf(&mut tracker, "B", 0, Some(5));
        assert!(tracker.remove_entry(gone));
        let before = tracker.clone();

        assert!(!tracker.remove_entry(gone));
        assert_eq!(tracker, before);
    }

    #[test]
    fn removing_running_entry_returns_to_idle() {
        let mut tracker = Tracker::new();
        leaf(&mut tracker, "A", 0, Some(10));
        let running = tracker.start_new_entry(None, &T0).unwrap();

        assert!(tracker.remove_entry(running));
        assert!(!tracker.is_running());
    }

    // ========== Rename / Edit Tests ==========

    #[test]
    fn rename_ignores_empty_names() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));

        assert_eq!(tracker.rename_entry(a, ""), Ok(false));
        assert_eq!(tracker.entry(a).unwrap().name, "A");
        assert_eq!(tracker.rename_entry(a, "Planning"), Ok(true));
        assert_eq!(tracker.entry(a).unwrap().name, "Planning");
    }

    #[test]
    fn edit_flag_toggles() {
        let mut tracker = Tracker::new();
        assert!(tracker.edit_enabled);
        assert!(!tracker.set_edit_enabled(false));
        assert!(!tracker.edit_enabled);
    }

    // ========== Manual Total Tests ==========

    #[test]
    fn adjust_total_from_zero_creates_exact_span() {
        let mut tracker = Tracker::new();
        let id = tracker.adjust_total("10", &T0).unwrap();

        let entry = tracker.entry(id).unwrap();
        assert_eq!(entry.name, MANUAL_ENTRY_NAME);
        assert_eq!(entry.end_time, Some(1_000));
        assert_eq!(entry.start_time, Some(400));
        assert_eq!(tracker.total_duration(&T0), 600);
        assert_eq!(tracker.total.total_time, 600);
    }

    #[test]
    fn adjust_total_accounts_for_existing_entries() {
        let mut tracker = Tracker::new();
        leaf(&mut tracker, "A", 0, Some(1_000));
        tracker.adjust_total("12.5", &FixedClock(5_000)).unwrap();

        assert_eq!(tracker.total_duration(&FixedClock(9_999)), 750);
    }

    #[test]
    fn adjust_total_below_current_backdates_negative_span() {
        let mut tracker = Tracker::new();
        leaf(&mut tracker, "A", 0, Some(1_200));
        let id = tracker.adjust_total("5", &FixedClock(2_000)).unwrap();

        assert_eq!(tracker.duration(id, &FixedClock(2_000)), -900);
        assert_eq!(tracker.total_duration(&FixedClock(2_000)), 300);
    }

    #[test]
    fn adjust_total_rejects_bad_input() {
        let mut tracker = Tracker::new();
        for input in ["", "   ", "ten", "NaN", "inf"] {
            assert_eq!(
                tracker.adjust_total(input, &T0),
                Err(EngineError::InvalidTotal {
                    input: input.to_string()
                }),
                "input {input:?}"
            );
        }
        assert!(tracker.is_empty());
    }

    #[test]
    fn adjust_total_rejects_totals_outside_calendar_range() {
        let mut tracker = Tracker::new();
        leaf(&mut tracker, "A", 0, Some(60));
        let before = tracker.clone();
        for input in ["-1e300", "1e300", "-1e15"] {
            assert_eq!(
                tracker.adjust_total(input, &T0),
                Err(EngineError::InvalidTotal {
                    input: input.to_string()
                }),
                "input {input:?}"
            );
        }
        assert_eq!(tracker, before);
    }

    #[test]
    fn adjust_total_accepts_large_but_representable_totals() {
        let mut tracker = Tracker::new();
        // A century of minutes.
        let minutes = 100 * 365 * 24 * 60;
        tracker.adjust_total(&minutes.to_string(), &T0).unwrap();
        assert_eq!(tracker.total_duration(&T0), i64::from(minutes) * 60);
    }

    #[test]
    fn extreme_stored_spans_saturate_instead_of_overflowing() {
        let mut tracker = Tracker::new();
        leaf(&mut tracker, "A", i64::MIN, Some(i64::MAX));
        leaf(&mut tracker, "B", 0, Some(i64::MAX));

        assert_eq!(tracker.total_duration(&T0), i64::MAX);
    }

    #[test]
    fn adjust_total_while_running_is_rejected() {
        let mut tracker = Tracker::new();
        tracker.start_new_entry(None, &T0).unwrap();
        assert_eq!(
            tracker.adjust_total("10", &T0),
            Err(EngineError::AlreadyRunning)
        );
        assert_eq!(tracker.entries().len(), 1);
    }

    // ========== Addressing Tests ==========

    #[test]
    fn paths_resolve_in_display_order() {
        let mut tracker = Tracker::new();
        let a = leaf(&mut tracker, "A", 0, Some(10));
        let b = leaf(&mut tracker, "B", 10, Some(20));
        let b2 = tracker.start_sub_entry(b, None, &FixedClock(30)).unwrap();

        assert_eq!(tracker.resolve_path(&[1]), Some(a));
        assert_eq!(tracker.resolve_path(&[2, 2]), Some(b2));
        assert_eq!(tracker.resolve_path(&[0]), None);
        assert_eq!(tracker.resolve_path(&[3]), None);
        assert_eq!(tracker.resolve_path(&[]), None);

        let paths: Vec<_> = tracker.outline().into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec![vec![1], vec![2], vec![2, 1], vec![2, 2]]);
    }
}
