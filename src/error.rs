//! Error types for the dirkit CLI.

use std::{
    env::VarError,
    io,
    path::PathBuf,
    process::ExitCode,
    result::Result as StdResult,
    time::Duration,
};

use thiserror::Error;
use toml::{de::Error as TomlError, ser::Error as TomlSerError};

/// Result type for dirkit operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// The configuration file could not be serialized.
    #[error("Failed to serialize config: {source}")]
    ConfigSerialize {
        /// Underlying serialization error.
        source: TomlSerError,
    },
    /// The configuration file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A configured command line could not be split into words.
    #[error("Invalid command for {key} in config: {message}")]
    CommandParse {
        /// Config key holding the command.
        key: &'static str,
        /// Error message describing the parse failure.
        message: String,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A path could not be expanded.
    #[error("Invalid path: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// The directory to inspect does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// Path that does not exist.
        path: PathBuf,
    },
    /// The path to inspect exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// Path that is not a directory.
        path: PathBuf,
    },
    /// A directory could not be listed.
    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The GitHub CLI is missing or not logged in.
    #[error(
        "GitHub CLI (gh) is not installed or not authenticated.\n\n\
         To install gh:\n  \
         macOS:   brew install gh\n  \
         Linux:   See https://github.com/cli/cli/blob/trunk/docs/install_linux.md\n  \
         Windows: winget install --id GitHub.cli\n\n\
         To authenticate:\n  \
         gh auth login"
    )]
    GhUnavailable,
    /// yt-dlp is missing or broken.
    #[error("yt-dlp not found. Please install it first:\npip install yt-dlp")]
    YtDlpUnavailable,
    /// No GitHub username was given and none could be discovered.
    #[error("No GitHub username given; pass --username or set `username` in {config_path}")]
    UsernameUnknown {
        /// Path to the config file.
        config_path: PathBuf,
    },
    /// An external program could not be started.
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        /// Program that failed to spawn.
        program: String,
        /// Underlying spawn error.
        source: io::Error,
    },
    /// An external program did not finish in time.
    #[error("`{program}` timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Program that timed out.
        program: String,
        /// Time limit that elapsed.
        timeout: Duration,
    },
    /// Both repository listing endpoints failed.
    #[error("{message}")]
    RepoList {
        /// Error output from the GitHub CLI.
        message: String,
    },
    /// Repository listing output was not valid JSON.
    #[error("{source}")]
    RepoParse {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Results could not be serialized for output.
    #[error("Failed to serialize results: {source}")]
    JsonSerialize {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Command output could not be written.
    #[error("Failed to write output: {source}")]
    Output {
        /// Underlying IO error.
        source: io::Error,
    },
    /// A thumbnail could not be moved into place.
    #[error("Failed to move {from} to {to}: {source}")]
    ThumbnailMove {
        /// Downloaded file.
        from: PathBuf,
        /// Final thumbnail path.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A video URL could not be built.
    #[error("Invalid video URL for {video_id}: {source}")]
    VideoUrl {
        /// Video identifier.
        video_id: String,
        /// Underlying URL error.
        source: url::ParseError,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}
