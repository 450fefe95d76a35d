#![warn(missing_docs)]
//! Library support for the dirkit CLI.

use std::process::ExitCode;

/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and validation.
mod config;
/// Warning aggregation for per-item failures.
mod diagnostics;
/// Error handling for the crate.
mod error;
/// GitHub CLI queries.
mod github;
/// Local directory listings.
mod local;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// External process execution.
mod process;
/// Presence status for directories and repositories.
mod status;
/// Video file discovery and thumbnail bookkeeping.
mod thumbnail;
/// External tool metadata.
mod tool;
/// yt-dlp thumbnail downloads.
mod ytdlp;

/// Fixtures and fakes shared by unit tests.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, Result};

/// Run the CLI, returning the process exit code or a structured error.
pub async fn run() -> Result<ExitCode> {
    cli::run().await
}
