//! Markdown time tracker CLI library.
//!
//! This crate provides the CLI interface for the time tracker.

mod cli;
pub mod commands;
mod config;
pub mod store;

pub use cli::{Cli, Commands, DocumentArgs, EditMode};
pub use config::Config;
