//! Periodic display refresh.
//!
//! A display surface owns a [`LiveHandle`] and calls [`refresh_tick`] on a
//! fixed interval. Once the surface goes away it releases the handle and the
//! next tick returns `None`, telling the driver to stop rescheduling. Ticks
//! only read the tracker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::clock::Clock;
use crate::format::{ReportSettings, format_duration};
use crate::tracker::Tracker;

/// Shared liveness flag for one display surface.
///
/// Clones share the flag, so any holder can release it.
#[derive(Debug, Clone)]
pub struct LiveHandle(Arc<AtomicBool>);

impl Default for LiveHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveHandle {
    /// Creates a live handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Returns true until [`release`](Self::release) is called.
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks the surface as gone. Idempotent.
    pub fn release(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Display strings produced by one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickView {
    /// Formatted live total of the whole tracker.
    pub total: String,
    /// Formatted elapsed time of the running entry, if any.
    pub current: Option<String>,
}

/// Renders the live durations, or `None` once the handle is released.
pub fn refresh_tick(
    handle: &LiveHandle,
    tracker: &Tracker,
    settings: &ReportSettings,
    clock: &impl Clock,
) -> Option<TickView> {
    if !handle.is_live() {
        tracing::debug!("display released, stopping refresh");
        return None;
    }
    Some(TickView {
        total: format_duration(tracker.total_duration(clock), settings),
        current: tracker
            .current_duration(clock)
            .map(|secs| format_duration(secs, settings)),
    })
}
