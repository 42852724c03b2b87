//! Presentation layer for roundtable
//!
//! This crate contains CLI definitions, the console presentation sink,
//! output formatters and progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::{OutputConfig, Pacing};
pub use output::console::ConsoleFormatter;
pub use output::sink::ConsolePresentationSink;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
