//! Local directory listings.

use std::{fs, path::Path};

use crate::error::{Error, Result};

/// A checked-out project directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalDir {
    /// Directory name, compared against repository names.
    pub(crate) name: String,
    /// Full path to the directory.
    pub(crate) path: String,
}

/// List the immediate, non-hidden subdirectories of `path`, sorted by name.
pub fn subdirectories(path: &Path) -> Result<Vec<LocalDir>> {
    let entries = fs::read_dir(path).map_err(|error| Error::DirectoryRead {
        path: path.to_path_buf(),
        source: error,
    })?;

    let mut dirs = Vec::new();
    for entry in entries.filter_map(|entry| entry.ok()) {
        let entry_path = entry.path();
        if !entry_path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        dirs.push(LocalDir {
            name,
            path: entry_path.display().to_string(),
        });
    }
    dirs.sort();
    Ok(dirs)
}
