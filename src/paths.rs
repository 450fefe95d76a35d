//! Path expansion and normalization utilities.

use std::{
    env,
    path::{MAIN_SEPARATOR, Path, PathBuf},
};

use path_clean::PathClean;

use crate::error::{Error, Result};

/// Return the default config path for the current platform.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::HomeDirMissing)?;
    Ok(home.join(".dirkit.toml"))
}

/// Expand a user-provided path and resolve it relative to a base directory.
pub fn expand_path(raw: &str, base_dir: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|error| Error::PathExpansion {
        path: raw.to_string(),
        source: error,
    })?;
    let expanded_path = PathBuf::from(expanded.as_ref());
    let resolved = if expanded_path.is_relative() {
        base_dir.join(expanded_path)
    } else {
        expanded_path
    };
    Ok(normalize_path(&resolved))
}

/// Normalize a path by canonicalizing when possible and cleaning otherwise.
pub fn normalize_path(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => path.clean(),
    }
}

/// Resolve the directory a command operates on, checking that it exists.
pub fn resolve_directory(raw: &Path) -> Result<PathBuf> {
    let absolute = if raw.is_relative() {
        let cwd = env::current_dir().map_err(|error| Error::DirectoryRead {
            path: raw.to_path_buf(),
            source: error,
        })?;
        cwd.join(raw)
    } else {
        raw.to_path_buf()
    };
    let path = normalize_path(&absolute);

    if !path.exists() {
        return Err(Error::DirectoryNotFound { path });
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory { path });
    }
    Ok(path)
}

/// Render a path for display, using a tilde prefix for the home directory.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}
