//! Locating and rewriting tracker code blocks inside Markdown documents.
//!
//! A tracker lives in a fenced code block tagged with a language id:
//!
//! ````markdown
//! ```my-time-tracker
//! {"entries":[]}
//! ```
//! ````
//!
//! Rewrites replace only the lines between the fences. Every other line of
//! the document is preserved byte for byte, including `\r` line endings.

use thiserror::Error;

/// Language id tagging tracker blocks.
pub const DEFAULT_LANGUAGE: &str = "my-time-tracker";

const FENCE: &str = "```";

/// Errors locating a tracker block.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The document has fewer tracker blocks than requested.
    #[error("tracker block {index} not found ({found} in document)")]
    BlockNotFound { index: usize, found: usize },
    /// An opening fence has no closing fence.
    #[error("tracker block opened on line {line} is never closed")]
    UnterminatedBlock { line: usize },
}

/// A tracker block's position and inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerBlock {
    /// 0-based line index of the opening fence.
    pub line_start: usize,
    /// 0-based line index of the closing fence.
    pub line_end: usize,
    /// Lines strictly between the fences, joined with `\n`.
    pub content: String,
}

fn is_opening_fence(line: &str, language: &str) -> bool {
    line.trim()
        .strip_prefix(FENCE)
        .is_some_and(|rest| rest.trim() == language)
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// Finds every block tagged `language`, in document order.
pub fn find_blocks(text: &str, language: &str) -> Result<Vec<TrackerBlock>, DocumentError> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !is_opening_fence(lines[i], language) {
            i += 1;
            continue;
        }
        let line_start = i;
        let line_end = (line_start + 1..lines.len())
            .find(|&j| is_closing_fence(lines[j]))
            .ok_or(DocumentError::UnterminatedBlock {
                line: line_start + 1,
            })?;
        blocks.push(TrackerBlock {
            line_start,
            line_end,
            content: lines[line_start + 1..line_end].join("\n"),
        });
        i = line_end + 1;
    }
    Ok(blocks)
}

/// Selects the `index`-th (1-based) tracker block of a document.
pub fn find_block(text: &str, language: &str, index: usize) -> Result<TrackerBlock, DocumentError> {
    let blocks = find_blocks(text, language)?;
    let found = blocks.len();
    index
        .checked_sub(1)
        .and_then(|i| blocks.into_iter().nth(i))
        .ok_or(DocumentError::BlockNotFound { index, found })
}

/// Replaces the inner lines of `block` with `content`.
///
/// `block` must come from [`find_blocks`] on the same `text`.
pub fn splice_block(text: &str, block: &TrackerBlock, content: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let prev = lines[..=block.line_start].join("\n");
    let next = lines[block.line_end..].join("\n");
    format!("{prev}\n{content}\n{next}")
}

/// Appends an empty tracker block to the end of a document.
pub fn append_block(text: &str, language: &str) -> String {
    let mut out = text.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("{FENCE}{language}\n{FENCE}\n"));
    out
}
