//! Presence status for directories and repositories.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{github::Repo, local::LocalDir};

/// Whether a local directory has a matching repository on GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteStatus {
    /// True when the repository exists.
    pub(crate) exists: bool,
    /// Local directory path.
    pub(crate) path: String,
    /// Repository URL when it exists.
    pub(crate) url: Option<String>,
}

/// Whether a GitHub repository is cloned locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalStatus {
    /// True when a directory with the repository's name exists.
    pub(crate) exists_locally: bool,
    /// Repository web URL.
    pub(crate) url: String,
    /// HTTPS clone URL.
    pub(crate) clone_url: String,
    /// Repository description, if any.
    pub(crate) description: Option<String>,
}

impl LocalStatus {
    /// Description suffix (` - text`) for display, empty when there is none.
    pub(crate) fn description_suffix(&self) -> String {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => format!(" - {text}"),
            _ => String::new(),
        }
    }
}

/// Results keyed by directory name.
pub type RemoteReport = BTreeMap<String, RemoteStatus>;

/// Results keyed by repository name.
pub type LocalReport = BTreeMap<String, LocalStatus>;

/// Counts for a summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Items checked.
    pub(crate) total: usize,
    /// Items present.
    pub(crate) present: usize,
    /// Items missing.
    pub(crate) missing: usize,
}

impl Tally {
    /// Count present and missing flags.
    pub(crate) fn from_flags(flags: impl IntoIterator<Item = bool>) -> Self {
        let mut tally = Self::default();
        for present in flags {
            tally.total += 1;
            if present {
                tally.present += 1;
            } else {
                tally.missing += 1;
            }
        }
        tally
    }

    /// Tally a remote report.
    pub(crate) fn remote(report: &RemoteReport) -> Self {
        Self::from_flags(report.values().map(|status| status.exists))
    }

    /// Tally a local report.
    pub(crate) fn local(report: &LocalReport) -> Self {
        Self::from_flags(report.values().map(|status| status.exists_locally))
    }
}

/// Compare repositories against local directory names.
pub fn build_local_report(repos: Vec<Repo>, local: &[LocalDir]) -> LocalReport {
    let names: BTreeSet<&str> = local.iter().map(|dir| dir.name.as_str()).collect();
    repos
        .into_iter()
        .map(|repo| {
            let status = LocalStatus {
                exists_locally: names.contains(repo.name.as_str()),
                url: repo.html_url,
                clone_url: repo.clone_url,
                description: repo.description,
            };
            (repo.name, status)
        })
        .collect()
}
