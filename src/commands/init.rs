//! Implementation of the `dirkit init` command.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use inquire::{Text, error::InquireError};

use crate::{
    commands::emit,
    config::{Config, RawConfig},
    error::{Error, Result},
    github::GhClient,
    paths::display_path,
    process::SystemRunner,
};

/// Execute the init command.
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let path = Config::resolve_path(config_path)?;
    if report_existing(&path, &mut io::stdout().lock())? {
        return Ok(());
    }

    let config = Config::load_from(&path)?;
    let detected = GhClient::new(&SystemRunner, &config).current_login().await;
    let username = prompt_username(detected.as_deref())?;

    let raw = RawConfig {
        username,
        ..RawConfig::default()
    };
    write_config(&path, &raw)?;

    println!("Created config at {}", display_path(&path));
    Ok(())
}

/// Print a notice and return true when a config file is already present.
///
/// The file is not parsed, so a malformed config is left alone.
fn report_existing(path: &Path, out: &mut dyn Write) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    emit(out, format_args!("Config already exists at {}", display_path(path)))?;
    Ok(true)
}

/// Ask for the default GitHub username, suggesting the logged-in account.
fn prompt_username(detected: Option<&str>) -> Result<Option<String>> {
    let mut prompt =
        Text::new("GitHub username").with_help_message("Leave empty to use the gh login");
    if let Some(login) = detected {
        prompt = prompt.with_default(login);
    }

    let response = match prompt.prompt() {
        Ok(value) => value,
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            return Err(Error::PromptCanceled);
        }
        Err(error) => {
            return Err(Error::PromptFailed {
                message: error.to_string(),
            });
        }
    };

    let trimmed = response.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Serialize a config and write it, creating the parent directory.
fn write_config(path: &Path, raw: &RawConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| Error::ConfigWrite {
            path: parent.to_path_buf(),
            source: error,
        })?;
    }

    let contents =
        toml::to_string(raw).map_err(|error| Error::ConfigSerialize { source: error })?;

    fs::write(path, contents).map_err(|error| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: error,
    })
}
