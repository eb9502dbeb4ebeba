//! Reading and rewriting tracker blocks in documents on disk.
//!
//! Mutations run read-modify-write under an exclusive advisory lock on the
//! document, so concurrent invocations serialize and the last write wins.
//! Saving never rolls back: a document that disappeared is skipped and a
//! failed write is logged. A block that does not parse is shown as an empty
//! tracker but never overwritten.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use mtt_core::document::{self, TrackerBlock};
use mtt_core::{MalformedTracker, Tracker, parse_tracker, to_json};

/// A tracker block inside a document as read from disk.
#[derive(Debug)]
pub struct Loaded {
    /// Full document text.
    pub text: String,
    pub block: TrackerBlock,
    /// Parsed tracker, or a fresh one when the block is malformed.
    pub tracker: Tracker,
    /// Why the block could not be parsed, if it could not.
    pub malformed: Option<MalformedTracker>,
}

/// Address of one tracker block: document path, fence language, and index.
#[derive(Debug, Clone)]
pub struct TrackerDocument {
    path: PathBuf,
    language: String,
    index: usize,
}

impl TrackerDocument {
    pub fn new(path: impl Into<PathBuf>, language: impl Into<String>, index: usize) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document and parses its tracker block.
    ///
    /// A malformed block is not an error here; it loads as a fresh tracker
    /// with [`Loaded::malformed`] set and the caller decides how to report it.
    pub fn load(&self) -> Result<Loaded> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let block = document::find_block(&text, &self.language, self.index)
            .with_context(|| format!("no tracker in {}", self.path.display()))?;
        let (tracker, malformed) = match parse_tracker(&block.content) {
            Ok(tracker) => (tracker, None),
            Err(error) => (Tracker::new(), Some(error)),
        };
        Ok(Loaded {
            text,
            block,
            tracker,
            malformed,
        })
    }

    /// Loads the tracker for display, warning if the block is malformed.
    pub fn read(&self) -> Result<Tracker> {
        let loaded = self.load()?;
        if let Some(error) = &loaded.malformed {
            warn_malformed(&self.path, error);
        }
        Ok(loaded.tracker)
    }

    /// Applies `mutate` to the tracker and writes the block back.
    ///
    /// If `mutate` fails nothing is written.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut Tracker) -> Result<T>) -> Result<T> {
        let lock = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        lock.lock_exclusive()
            .with_context(|| format!("failed to lock {}", self.path.display()))?;

        let Loaded {
            text,
            block,
            mut tracker,
            malformed,
        } = self.load()?;
        if let Some(error) = malformed {
            return Err(error).with_context(|| {
                format!(
                    "refusing to overwrite unreadable tracker in {}",
                    self.path.display()
                )
            });
        }
        let result = mutate(&mut tracker)?;
        self.save(&text, &block, &tracker);
        Ok(result)
    }

    fn save(&self, text: &str, block: &TrackerBlock, tracker: &Tracker) {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "document is gone, skipping save");
            return;
        }
        let json = match to_json(tracker) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize tracker");
                return;
            }
        };
        let content = document::splice_block(text, block, &json);
        match fs::write(&self.path, content) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "saved tracker"),
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "failed to save tracker");
            }
        }
    }
}

/// Logs a block that fell back to an empty tracker.
pub fn warn_malformed(path: &Path, error: &MalformedTracker) {
    tracing::warn!(%error, path = %path.display(), "failed to parse tracker, showing it empty");
}

/// Appends an empty tracker block, creating the document if needed.
pub fn insert_block(path: &Path, language: &str) -> Result<()> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let content = document::append_block(&text, language);
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
