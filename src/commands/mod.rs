//! CLI command implementations.

use std::{
    fmt::Display,
    io::{self, IsTerminal, Write},
    process::ExitCode,
};

use crate::error::{Error, Result};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Write one line of command output.
pub(crate) fn emit(out: &mut dyn Write, line: impl Display) -> Result<()> {
    writeln!(out, "{line}").map_err(|error| Error::Output { source: error })
}

/// Exit successfully when nothing is missing, otherwise with status 1.
pub(crate) fn exit_for_missing(missing: usize) -> ExitCode {
    if missing == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

// Command modules are ordered alphabetically - maintain this order.
/// Init command implementation.
pub mod init;
/// Repos command implementation.
pub mod repos;
/// Thumbnails command implementation.
pub mod thumbnails;
