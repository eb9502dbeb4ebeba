//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Time tracker for Markdown documents.
///
/// Keeps a tree of timed segments as JSON inside a fenced code block and
/// renders it as a table or CSV.
#[derive(Debug, Parser)]
#[command(name = "mtt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// The document and block a command operates on.
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Markdown document containing the tracker.
    pub file: PathBuf,

    /// Which tracker block in the document to use (1-based).
    #[arg(short, long, default_value_t = 1)]
    pub block: usize,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Append an empty tracker block to a document.
    Insert {
        /// Markdown document (created if missing).
        file: PathBuf,
    },

    /// Show the running entry, total, and entry outline.
    Status(DocumentArgs),

    /// Start a new top-level segment.
    Start {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Segment name (defaults to "Segment N").
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Stop the running entry.
    Stop(DocumentArgs),

    /// Start a new part under an existing entry, splitting it if needed.
    Continue {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Entry position as shown by `status` (e.g. 2 or 2.1).
        path: String,

        /// Part name (defaults to "Part N").
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Rename an entry (requires edit mode).
    Rename {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Entry position as shown by `status`.
        path: String,

        /// New name.
        name: String,
    },

    /// Remove an entry and its parts (requires edit mode).
    Remove {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Entry position as shown by `status`.
        path: String,
    },

    /// Turn edit mode on or off.
    Edit {
        #[command(flatten)]
        doc: DocumentArgs,

        #[arg(value_enum)]
        mode: EditMode,

        /// When turning edit mode off, force the total to this many minutes.
        #[arg(long, allow_hyphen_values = true)]
        total: Option<String>,
    },

    /// Print the tracker as a Markdown table.
    Table(DocumentArgs),

    /// Print the tracker as CSV.
    Csv(DocumentArgs),

    /// Print the stored tracker JSON.
    Json(DocumentArgs),

    /// Redraw live durations every second until interrupted.
    Watch {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Stop after this many redraws.
        #[arg(long)]
        ticks: Option<u64>,
    },
}

/// Edit mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EditMode {
    On,
    Off,
}
