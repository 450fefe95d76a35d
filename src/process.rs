//! External process execution.
//!
//! Every call to `gh` or `yt-dlp` goes through a [`CommandRunner`], so the
//! commands can be exercised against a scripted runner in tests.

use std::{io::ErrorKind, process::Stdio, time::Duration};

use tokio::{process::Command, time};
use tracing::debug;

use crate::error::{Error, Result};

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute.
    program: String,
    /// Arguments passed to the program.
    args: Vec<String>,
    /// Optional time limit.
    timeout: Option<Duration>,
}

impl Invocation {
    /// Start an invocation from a command line whose first word is the program.
    pub(crate) fn new(command: &[String]) -> Self {
        let mut words = command.iter().cloned();
        let program = words.next().unwrap_or_default();
        Self {
            program,
            args: words.collect(),
            timeout: None,
        }
    }

    /// Append an argument.
    pub(crate) fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub(crate) fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Limit how long the command may run.
    pub(crate) fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Program name.
    pub(crate) fn program(&self) -> &str {
        &self.program
    }

    /// Time limit, if any.
    pub(crate) fn time_limit(&self) -> Option<Duration> {
        self.timeout
    }

    /// Arguments after the program.
    pub(crate) fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Render the full command line for logs.
    pub(crate) fn display(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully.
    pub(crate) success: bool,
    /// Exit code, if the process exited normally.
    pub(crate) code: Option<i32>,
    /// Captured standard output.
    pub(crate) stdout: String,
    /// Captured standard error.
    pub(crate) stderr: String,
}

/// Executes external commands.
pub trait CommandRunner {
    /// Run a command to completion and capture its output.
    ///
    /// Returns [`Error::Spawn`] when the program cannot be started and
    /// [`Error::Timeout`] when it outlives the invocation's time limit. A
    /// non-zero exit is not an error at this level.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!(command = %invocation.display(), "running");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let pending = command.output();
        let output = match invocation.timeout {
            Some(limit) => match time::timeout(limit, pending).await {
                Ok(output) => output,
                Err(_) => {
                    return Err(Error::Timeout {
                        program: invocation.program.clone(),
                        timeout: limit,
                    });
                }
            },
            None => pending.await,
        }
        .map_err(|error| Error::Spawn {
            program: invocation.program.clone(),
            source: error,
        })?;

        let result = CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            command = %invocation.display(),
            code = ?result.code,
            "finished"
        );
        Ok(result)
    }
}

/// Return true when an error means the program itself could not be found.
pub(crate) fn is_not_found(error: &Error) -> bool {
    matches!(error, Error::Spawn { source, .. } if source.kind() == ErrorKind::NotFound)
}
