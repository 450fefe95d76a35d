//! Warning aggregation and diagnostic summaries.

use std::io::Write;

use tracing::warn;

use crate::{commands::emit, error::Result, palette::fmt_warning};

/// Aggregates per-item problems for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Whether warnings are colorized.
    use_color: bool,
    /// Collected warning messages.
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new(use_color: bool) -> Self {
        Self {
            use_color,
            warnings: Vec::new(),
        }
    }

    /// Record a warning and print it inline with the command output.
    pub(crate) fn warn(&mut self, out: &mut dyn Write, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        emit(out, fmt_warning(&format!("⚠️  {message}"), self.use_color))?;
        self.warnings.push(message);
        Ok(())
    }

    /// Record a problem the caller has already reported.
    pub(crate) fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Number of recorded warnings.
    pub(crate) fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Print a warning summary when warnings were emitted.
    pub(crate) fn print_warning_summary(&self) {
        if self.warnings.is_empty() {
            return;
        }

        eprintln!("Completed with {} warning(s).", self.count());
    }
}
