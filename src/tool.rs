//! External tool metadata.

use crate::{
    config::Config,
    error::Error,
    process::Invocation,
};

/// External command-line tools driven by dirkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The GitHub CLI.
    Gh,
    /// The yt-dlp media downloader.
    YtDlp,
}

impl Tool {
    /// Return the identifier used in config keys.
    pub(crate) fn id(self) -> &'static str {
        match self {
            Self::Gh => "gh",
            Self::YtDlp => "yt_dlp",
        }
    }

    /// Start an invocation of this tool using the configured command line.
    pub(crate) fn invocation(self, config: &Config) -> Invocation {
        let command = match self {
            Self::Gh => config.gh(),
            Self::YtDlp => config.yt_dlp(),
        };
        Invocation::new(command)
    }

    /// Return the error reported when the tool is missing or unusable.
    pub(crate) fn unavailable(self) -> Error {
        match self {
            Self::Gh => Error::GhUnavailable,
            Self::YtDlp => Error::YtDlpUnavailable,
        }
    }
}
