//! Watch command: redraws live durations once per tick.
//!
//! The display stays live until Ctrl-C, until the tracker block disappears
//! from the document, or until the requested number of ticks has run.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use mtt_core::{Clock, LiveHandle, ReportSettings, Tracker, refresh_tick};

use crate::store::{self, TrackerDocument};

/// Default redraw period.
pub const TICK: Duration = Duration::from_secs(1);

/// Tracks whether the current run of malformed loads has been reported, so
/// a broken block warns once instead of on every tick.
#[derive(Debug, Default)]
struct MalformedNotice {
    reported: bool,
}

impl MalformedNotice {
    /// Returns true when this load starts a new run of malformed loads.
    const fn observe(&mut self, malformed: bool) -> bool {
        let report = malformed && !self.reported;
        self.reported = malformed;
        report
    }
}

pub async fn run<W: Write>(
    writer: &mut W,
    doc: &TrackerDocument,
    settings: &ReportSettings,
    clock: &impl Clock,
    period: Duration,
    max_ticks: Option<u64>,
) -> Result<()> {
    let handle = LiveHandle::new();
    let mut interval = tokio::time::interval(period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticks = 0;
    let mut notice = MalformedNotice::default();

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(error) = result {
                    tracing::warn!(%error, "failed to listen for Ctrl-C");
                }
                handle.release();
            }
            _ = interval.tick() => {}
        }

        // The block is the display surface; once it is gone we stop.
        let tracker = match doc.load() {
            Ok(loaded) => {
                let report = notice.observe(loaded.malformed.is_some());
                if let (true, Some(error)) = (report, &loaded.malformed) {
                    store::warn_malformed(doc.path(), error);
                }
                loaded.tracker
            }
            Err(error) => {
                tracing::info!(error = %format!("{error:#}"), "tracker unavailable, stopping watch");
                handle.release();
                Tracker::new()
            }
        };
        let Some(view) = refresh_tick(&handle, &tracker, settings, clock) else {
            break;
        };

        match view.current {
            Some(current) => writeln!(writer, "total {} | current {current}", view.total)?,
            None => writeln!(writer, "total {} | idle", view.total)?,
        }
        writer.flush()?;

        ticks += 1;
        if max_ticks.is_some_and(|max| ticks >= max) {
            handle.release();
        }
    }

    Ok(())
}
