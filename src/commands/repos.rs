//! Implementation of the `dirkit repos` command.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use serde::Serialize;

use crate::{
    commands::{ColorChoice, emit, exit_for_missing},
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    github::{GhClient, Lookup, repo_url},
    local::subdirectories,
    palette::{fmt_description, fmt_fail_mark, fmt_heading, fmt_link, fmt_mark, fmt_ok_mark},
    paths::resolve_directory,
    process::{CommandRunner, SystemRunner},
    status::{LocalReport, RemoteReport, RemoteStatus, Tally, build_local_report},
    tool::Tool,
};

/// Width of the summary rules.
const RULE_WIDTH: usize = 60;

/// Options for the repos command.
#[derive(Debug, Clone)]
pub struct ReposOptions {
    /// Directory whose subdirectories are compared.
    pub(crate) directory: PathBuf,
    /// GitHub username override.
    pub(crate) username: Option<String>,
    /// Print every item instead of only the interesting ones.
    pub(crate) verbose: bool,
    /// List GitHub repositories missing locally instead.
    pub(crate) inverse: bool,
    /// Suppress the header and summary.
    pub(crate) quiet: bool,
    /// Print results as JSON.
    pub(crate) json: bool,
}

/// Results of one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// Local directories checked against GitHub.
    Remote(RemoteReport),
    /// GitHub repositories checked against local directories.
    Local(LocalReport),
}

impl Report {
    /// Number of entries missing on the other side.
    pub(crate) fn missing(&self) -> usize {
        match self {
            Self::Remote(report) => Tally::remote(report).missing,
            Self::Local(report) => Tally::local(report).missing,
        }
    }
}

/// Execute the repos command.
pub async fn run(
    color: ColorChoice,
    config_path: Option<PathBuf>,
    options: ReposOptions,
) -> Result<ExitCode> {
    let config = Config::load(config_path.as_deref())?;
    let report = execute(
        &SystemRunner,
        &config,
        color.enabled(),
        &options,
        &mut io::stdout().lock(),
    )
    .await?;
    Ok(exit_for_missing(report.missing()))
}

/// Run the comparison and write its human-readable output or, with `--json`,
/// only the pretty-printed result map to `out`.
pub(crate) async fn execute<R: CommandRunner>(
    runner: &R,
    config: &Config,
    use_color: bool,
    options: &ReposOptions,
    out: &mut dyn Write,
) -> Result<Report> {
    if !options.json {
        return compare(runner, config, use_color, options, out).await;
    }

    let report = compare(runner, config, use_color, options, &mut io::sink()).await?;
    let text = serde_json::to_string_pretty(&report)
        .map_err(|error| Error::JsonSerialize { source: error })?;
    emit(out, text)?;
    Ok(report)
}

/// Run the comparison, writing human-readable progress and summary to `out`.
pub(crate) async fn compare<R: CommandRunner>(
    runner: &R,
    config: &Config,
    use_color: bool,
    options: &ReposOptions,
    out: &mut dyn Write,
) -> Result<Report> {
    let client = GhClient::new(runner, config);
    if !client.is_authenticated().await {
        return Err(Tool::Gh.unavailable());
    }

    let directory = resolve_directory(&options.directory)?;
    let username = resolve_username(&client, config, options.username.as_deref()).await?;
    let verbose = options.verbose && !options.quiet;
    let mut diagnostics = Diagnostics::new(use_color);

    if !options.quiet {
        emit(
            out,
            format_args!("Directory: {} | User: {}", directory.display(), username),
        )?;
    }

    let mut check = Check {
        client: &client,
        username: &username,
        verbose,
        use_color,
        diagnostics: &mut diagnostics,
        out,
    };

    let report = if options.inverse {
        let report = check.missing_locally(&directory).await?;
        if !options.quiet {
            check.print_local_summary(&report)?;
        }
        Report::Local(report)
    } else {
        let report = check.missing_remotely(&directory).await?;
        if !options.quiet {
            check.print_remote_summary(&report)?;
        }
        Report::Remote(report)
    };

    diagnostics.print_warning_summary();
    Ok(report)
}

/// Pick the username from the flag, the config, or the logged-in account.
async fn resolve_username<R: CommandRunner>(
    client: &GhClient<'_, R>,
    config: &Config,
    flag: Option<&str>,
) -> Result<String> {
    if let Some(name) = flag.map(str::trim).filter(|name| !name.is_empty()) {
        return Ok(name.to_string());
    }
    if let Some(name) = config.username() {
        return Ok(name.to_string());
    }
    client
        .current_login()
        .await
        .ok_or_else(|| Error::UsernameUnknown {
            config_path: config.path().to_path_buf(),
        })
}

/// Shared state for one comparison run.
struct Check<'a, 'c, R> {
    /// GitHub client.
    client: &'a GhClient<'c, R>,
    /// Account compared against.
    username: &'a str,
    /// Print every item.
    verbose: bool,
    /// Colorize marks and headings.
    use_color: bool,
    /// Per-item problem collector.
    diagnostics: &'a mut Diagnostics,
    /// Output sink.
    out: &'a mut dyn Write,
}

impl<R: CommandRunner> Check<'_, '_, R> {
    /// Check each local subdirectory for a repository of the same name.
    async fn missing_remotely(&mut self, directory: &Path) -> Result<RemoteReport> {
        let dirs = subdirectories(directory)?;
        let mut report = RemoteReport::new();

        if dirs.is_empty() {
            emit(
                self.out,
                format_args!("No subdirectories found in {}", directory.display()),
            )?;
            return Ok(report);
        }

        emit(
            self.out,
            format_args!(
                "Checking {} subdirectories against GitHub user '{}'...\n",
                dirs.len(),
                self.username
            ),
        )?;

        for dir in dirs {
            let lookup = self.client.lookup_repo(self.username, &dir.name).await;
            self.report_lookup_problem(&dir.name, &lookup)?;

            let exists = lookup.exists();
            let url = exists.then(|| repo_url(self.username, &dir.name));
            if self.verbose || exists {
                let suffix = url
                    .as_deref()
                    .map(|url| format!(" → {}", fmt_link(url, self.use_color)))
                    .unwrap_or_default();
                emit(
                    self.out,
                    format_args!("{} {}{}", fmt_mark(exists, self.use_color), dir.name, suffix),
                )?;
            }

            report.insert(
                dir.name,
                RemoteStatus {
                    exists,
                    path: dir.path,
                    url,
                },
            );
        }

        Ok(report)
    }

    /// Print and record lookups that failed for reasons other than absence.
    fn report_lookup_problem(&mut self, name: &str, lookup: &Lookup) -> Result<()> {
        let fail = fmt_fail_mark(self.use_color);
        match lookup {
            Lookup::Found | Lookup::NotFound => {}
            Lookup::Unexpected(stderr) => {
                self.diagnostics
                    .warn(self.out, format!("Unexpected error for {name}: {stderr}"))?;
            }
            Lookup::TimedOut => {
                emit(self.out, format_args!("{fail} Timeout checking {name}"))?;
                self.diagnostics.record(format!("Timeout checking {name}"));
            }
            Lookup::Failed(message) => {
                emit(self.out, format_args!("{fail} Error checking {name}: {message}"))?;
                self.diagnostics
                    .record(format!("Error checking {name}: {message}"));
            }
        }
        Ok(())
    }

    /// Check each GitHub repository for a local directory of the same name.
    async fn missing_locally(&mut self, directory: &Path) -> Result<LocalReport> {
        emit(
            self.out,
            format_args!(
                "Fetching all repositories for GitHub user '{}'...",
                self.username
            ),
        )?;

        let fail = fmt_fail_mark(self.use_color);
        let repos = match self.client.list_repos(self.username).await {
            Ok(repos) => repos,
            Err(error) => {
                let message = match &error {
                    Error::Timeout { .. } => "Timeout fetching repos".to_string(),
                    Error::RepoParse { .. } => format!("Error parsing repo data: {error}"),
                    _ => format!("Error fetching repos: {error}"),
                };
                emit(self.out, format_args!("{fail} {message}"))?;
                self.diagnostics.record(message);
                Vec::new()
            }
        };

        if repos.is_empty() {
            emit(self.out, "No repositories found or error fetching repos")?;
            return Ok(LocalReport::new());
        }

        let local = subdirectories(directory)?;
        emit(
            self.out,
            format_args!(
                "Checking {} GitHub repositories against local directory...\n",
                repos.len()
            ),
        )?;

        let report = build_local_report(repos, &local);
        for (name, status) in &report {
            if self.verbose || !status.exists_locally {
                emit(
                    self.out,
                    format_args!(
                        "{} {}{}",
                        fmt_mark(status.exists_locally, self.use_color),
                        name,
                        fmt_description(&status.description_suffix(), self.use_color)
                    ),
                )?;
            }
        }

        Ok(report)
    }

    /// Print the totals block shared by both summaries.
    fn print_totals(&mut self, line: &str) -> Result<()> {
        let rule = fmt_heading(&"=".repeat(RULE_WIDTH), self.use_color);
        emit(self.out, "")?;
        emit(self.out, &rule)?;
        emit(self.out, line)?;
        emit(self.out, &rule)
    }

    /// Print the summary for the default direction.
    fn print_remote_summary(&mut self, report: &RemoteReport) -> Result<()> {
        let tally = Tally::remote(report);
        self.print_totals(&format!(
            "Total: {} | Found: {} | Missing: {}",
            tally.total, tally.present, tally.missing
        ))?;

        if tally.missing > 0 {
            emit(self.out, "")?;
            emit(
                self.out,
                fmt_heading(
                    &format!("Missing repositories on GitHub ({}):", self.username),
                    self.use_color,
                ),
            )?;
            for (name, _) in report.iter().filter(|(_, status)| !status.exists) {
                emit(
                    self.out,
                    format_args!("  {} {}", fmt_fail_mark(self.use_color), name),
                )?;
            }
        }

        if tally.present > 0 {
            emit(self.out, "")?;
            emit(self.out, fmt_heading("Existing repositories:", self.use_color))?;
            for (name, status) in report.iter().filter(|(_, status)| status.exists) {
                let url = status.url.as_deref().unwrap_or_default();
                emit(
                    self.out,
                    format_args!(
                        "  {} {} → {}",
                        fmt_ok_mark(self.use_color),
                        name,
                        fmt_link(url, self.use_color)
                    ),
                )?;
            }
        }

        Ok(())
    }

    /// Print the summary for the inverse direction.
    fn print_local_summary(&mut self, report: &LocalReport) -> Result<()> {
        let tally = Tally::local(report);
        self.print_totals(&format!(
            "Total repos: {} | Local: {} | Not cloned: {}",
            tally.total, tally.present, tally.missing
        ))?;

        if tally.missing > 0 {
            emit(self.out, "")?;
            emit(
                self.out,
                fmt_heading("Repositories on GitHub not cloned locally:", self.use_color),
            )?;
            for (name, status) in report.iter().filter(|(_, status)| !status.exists_locally) {
                emit(
                    self.out,
                    format_args!(
                        "  {} {}{}",
                        fmt_fail_mark(self.use_color),
                        name,
                        fmt_description(&status.description_suffix(), self.use_color)
                    ),
                )?;
                emit(
                    self.out,
                    format_args!(
                        "    {}",
                        fmt_link(&format!("git clone {}", status.clone_url), self.use_color)
                    ),
                )?;
            }
        }

        if tally.present > 0 {
            emit(self.out, "")?;
            emit(self.out, fmt_heading("Already cloned locally:", self.use_color))?;
            for (name, _) in report.iter().filter(|(_, status)| status.exists_locally) {
                emit(
                    self.out,
                    format_args!("  {} {}", fmt_ok_mark(self.use_color), name),
                )?;
            }
        }

        Ok(())
    }
}
