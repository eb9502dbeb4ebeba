//! CLI subcommand implementations.

pub mod edit;
pub mod export;
pub mod insert;
pub mod status;
pub mod timer;
pub mod util;
pub mod watch;
