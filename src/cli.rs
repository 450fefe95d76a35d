//! CLI parsing and command dispatch.

use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    commands::{self, repos::ReposOptions, thumbnails::ThumbnailOptions},
    error::Result,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "dirkit",
    version,
    about = "Check project directories against GitHub and fetch video thumbnails",
    arg_required_else_help = true
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, global = true)]
    debug: bool,
    /// Config file to use instead of ~/.dirkit.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize a dirkit config file.
    Init,
    /// Check which subdirectories have GitHub repositories (requires gh).
    #[command(alias = "gh")]
    Repos {
        /// Directory to check.
        #[arg(default_value = ".")]
        directory: PathBuf,
        /// GitHub username to check (default: config, then the gh login).
        #[arg(short = 'u', long)]
        username: Option<String>,
        /// Show all results, not just existing repos.
        #[arg(short = 'v', long)]
        verbose: bool,
        /// Inverse mode: show GitHub repos not cloned locally.
        #[arg(short = 'i', long)]
        inverse: bool,
        /// Hide the header and summary.
        #[arg(short = 'q', long)]
        quiet: bool,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Download video thumbnails for files with [video-id] in their name (requires yt-dlp).
    #[command(alias = "thumbs")]
    Thumbnails {
        /// Directory to process.
        #[arg(default_value = ".")]
        directory: PathBuf,
        /// Execute downloads (default is dry run).
        #[arg(short = 'x', long)]
        execute: bool,
        /// Recursively process directories.
        #[arg(short = 'R', long)]
        recursive: bool,
    },
}

/// Run the requested command.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let color = cli.color.into_choice();

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command {
        Command::Init => {
            commands::init::run(cli.config.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Repos {
            directory,
            username,
            verbose,
            inverse,
            quiet,
            json,
        } => {
            let options = ReposOptions {
                directory,
                username,
                verbose,
                inverse,
                quiet,
                json,
            };
            commands::repos::run(color, cli.config, options).await
        }
        Command::Thumbnails {
            directory,
            execute,
            recursive,
        } => {
            let options = ThumbnailOptions {
                directory,
                execute,
                recursive,
            };
            commands::thumbnails::run(color, cli.config, options).await
        }
    }
}

/// Install the stderr log subscriber.
fn init_logging(debug: bool) {
    let default_filter = if debug { "dirkit=debug" } else { "dirkit=warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};

    #[test]
    fn verifies_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repos_flags() {
        let cli = Cli::try_parse_from(["dirkit", "repos", "-vi", "-u", "octocat", "/src"])
            .expect("parse");
        let Command::Repos {
            directory,
            username,
            verbose,
            inverse,
            quiet,
            json,
        } = cli.command
        else {
            panic!("expected repos");
        };
        assert_eq!(directory.to_str(), Some("/src"));
        assert_eq!(username.as_deref(), Some("octocat"));
        assert!(verbose && inverse);
        assert!(!quiet && !json);
    }

    #[test]
    fn thumbnails_default_to_dry_run_in_cwd() {
        let cli = Cli::try_parse_from(["dirkit", "--debug", "thumbs"]).expect("parse");
        assert!(cli.debug);
        let Command::Thumbnails {
            directory,
            execute,
            recursive,
        } = cli.command
        else {
            panic!("expected thumbnails");
        };
        assert_eq!(directory.to_str(), Some("."));
        assert!(!execute && !recursive);
    }

    #[test]
    fn accepts_short_execute_and_recursive() {
        let cli = Cli::try_parse_from(["dirkit", "thumbnails", "-x", "-R", "videos"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Thumbnails {
                execute: true,
                recursive: true,
                ..
            }
        ));
    }
}
