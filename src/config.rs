//! Configuration loading and validation.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    paths,
    tool::Tool,
};

/// Default GitHub CLI command.
const DEFAULT_GH: &str = "gh";
/// Default yt-dlp command.
const DEFAULT_YT_DLP: &str = "yt-dlp";

/// Parsed configuration for the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path the config was loaded from (or would be written to).
    path: PathBuf,
    /// Default GitHub username to compare against.
    username: Option<String>,
    /// Command line used to invoke the GitHub CLI.
    gh: Vec<String>,
    /// Command line used to invoke yt-dlp.
    yt_dlp: Vec<String>,
    /// Time limits for external commands.
    timeouts: Timeouts,
}

/// Time limits applied to external commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Limit for `gh auth status`.
    pub(crate) auth: Duration,
    /// Limit for a single repository lookup.
    pub(crate) lookup: Duration,
    /// Limit for listing all repositories.
    pub(crate) list: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            auth: Duration::from_secs(5),
            lookup: Duration::from_secs(10),
            list: Duration::from_secs(60),
        }
    }
}

/// Raw config file structure.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RawConfig {
    /// Default GitHub username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) username: Option<String>,
    /// GitHub CLI command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) gh: Option<String>,
    /// yt-dlp command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) yt_dlp: Option<String>,
    /// Timeout overrides in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) timeouts: Option<RawTimeouts>,
}

/// Raw timeout table.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RawTimeouts {
    /// Seconds allowed for `gh auth status`.
    auth_secs: Option<u64>,
    /// Seconds allowed per repository lookup.
    lookup_secs: Option<u64>,
    /// Seconds allowed for listing repositories.
    list_secs: Option<u64>,
}

impl Config {
    /// Load the config from an explicit path or the default location.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(explicit)?)
    }

    /// Resolve the config file location without reading it.
    pub(crate) fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => paths::expand_path(&path.to_string_lossy(), Path::new(".")),
            None => paths::default_config_path(),
        }
    }

    /// Load a config file from a path, falling back to defaults when it is absent.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Self::from_raw(path, RawConfig::default());
            }
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let raw: RawConfig = toml::from_str(&contents).map_err(|error| Error::ConfigParse {
            path: path.to_path_buf(),
            source: error,
        })?;

        Self::from_raw(path, raw)
    }

    /// Build a config from parsed file contents.
    fn from_raw(path: &Path, raw: RawConfig) -> Result<Self> {
        let username = raw
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let gh = split_command(Tool::Gh.id(), raw.gh.as_deref().unwrap_or(DEFAULT_GH))?;
        let yt_dlp = split_command(
            Tool::YtDlp.id(),
            raw.yt_dlp.as_deref().unwrap_or(DEFAULT_YT_DLP),
        )?;

        let defaults = Timeouts::default();
        let timeouts = match raw.timeouts {
            Some(raw) => Timeouts {
                auth: raw.auth_secs.map_or(defaults.auth, Duration::from_secs),
                lookup: raw.lookup_secs.map_or(defaults.lookup, Duration::from_secs),
                list: raw.list_secs.map_or(defaults.list, Duration::from_secs),
            },
            None => defaults,
        };

        Ok(Self {
            path: path.to_path_buf(),
            username,
            gh,
            yt_dlp,
            timeouts,
        })
    }

    /// Return the config file path.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Return the configured default username.
    pub(crate) fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Return the GitHub CLI command line.
    pub(crate) fn gh(&self) -> &[String] {
        &self.gh
    }

    /// Return the yt-dlp command line.
    pub(crate) fn yt_dlp(&self) -> &[String] {
        &self.yt_dlp
    }

    /// Return the configured timeouts.
    pub(crate) fn timeouts(&self) -> Timeouts {
        self.timeouts
    }
}

/// Split a configured command line into program and leading arguments.
fn split_command(key: &'static str, raw: &str) -> Result<Vec<String>> {
    let words = shell_words::split(raw).map_err(|error| Error::CommandParse {
        key,
        message: error.to_string(),
    })?;
    if words.is_empty() {
        return Err(Error::CommandParse {
            key,
            message: "command is empty".to_string(),
        });
    }
    Ok(words)
}
