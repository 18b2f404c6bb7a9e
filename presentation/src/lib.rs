//! Presentation layer for llm-consensus
//!
//! This crate contains the HTTP API, CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, parse_key};
pub use http::{ApiError, AppState, ProviderInfo, router};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
