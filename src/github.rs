//! Repository queries through the GitHub CLI.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::{Config, Timeouts},
    error::{Error, Result},
    process::{CommandRunner, Invocation, is_not_found},
    tool::Tool,
};

/// Repository fields read from the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repo {
    /// Repository name.
    pub(crate) name: String,
    /// Web URL of the repository.
    pub(crate) html_url: String,
    /// HTTPS clone URL.
    pub(crate) clone_url: String,
    /// Optional description.
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// Owning account, when reported.
    #[serde(default)]
    pub(crate) owner: Option<Owner>,
}

/// Owner of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    /// Account login.
    pub(crate) login: String,
}

impl Repo {
    /// Return true when the repository belongs to `username`.
    ///
    /// Repositories without owner data are assumed to match.
    pub(crate) fn is_owned_by(&self, username: &str) -> bool {
        self.owner
            .as_ref()
            .is_none_or(|owner| owner.login.eq_ignore_ascii_case(username))
    }
}

/// Outcome of checking whether one repository exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The repository exists.
    Found,
    /// GitHub reported the repository as not found.
    NotFound,
    /// The CLI failed for a reason other than a missing repository.
    Unexpected(String),
    /// The lookup exceeded its time limit.
    TimedOut,
    /// The CLI could not be run.
    Failed(String),
}

impl Lookup {
    /// Return true when the repository exists.
    pub(crate) fn exists(&self) -> bool {
        matches!(self, Self::Found)
    }
}

/// Client for the subset of the GitHub API used by dirkit.
pub struct GhClient<'a, R> {
    /// Runner used to execute `gh`.
    runner: &'a R,
    /// Base `gh` invocation from config.
    base: Invocation,
    /// Time limits for each call.
    timeouts: Timeouts,
}

impl<'a, R: CommandRunner> GhClient<'a, R> {
    /// Build a client from config.
    pub(crate) fn new(runner: &'a R, config: &Config) -> Self {
        Self {
            runner,
            base: Tool::Gh.invocation(config),
            timeouts: config.timeouts(),
        }
    }

    /// Check that `gh` is installed and logged in.
    pub(crate) async fn is_authenticated(&self) -> bool {
        let invocation = self
            .base
            .clone()
            .args(["auth", "status"])
            .timeout(self.timeouts.auth);
        match self.runner.run(&invocation).await {
            Ok(output) => output.success,
            Err(error) if is_not_found(&error) => {
                debug!("gh is not installed");
                false
            }
            Err(error) => {
                debug!(%error, "gh auth status failed");
                false
            }
        }
    }

    /// Return the login of the authenticated user, if it can be determined.
    pub(crate) async fn current_login(&self) -> Option<String> {
        let invocation = self
            .base
            .clone()
            .args(["api", "/user", "--jq", ".login"])
            .timeout(self.timeouts.lookup);
        let output = self.runner.run(&invocation).await.ok()?;
        if !output.success {
            return None;
        }
        let login = output.stdout.trim();
        (!login.is_empty()).then(|| login.to_string())
    }

    /// Check whether `username/name` exists.
    pub(crate) async fn lookup_repo(&self, username: &str, name: &str) -> Lookup {
        let invocation = self
            .base
            .clone()
            .arg("api")
            .arg(format!("/repos/{username}/{name}"))
            .timeout(self.timeouts.lookup);

        match self.runner.run(&invocation).await {
            Ok(output) if output.success => Lookup::Found,
            Ok(output) => {
                let stderr = output.stderr.trim();
                if stderr.contains("Not Found") || stderr.contains("404") {
                    Lookup::NotFound
                } else {
                    warn!(repo = name, stderr, "unexpected gh failure");
                    Lookup::Unexpected(stderr.to_string())
                }
            }
            Err(Error::Timeout { .. }) => Lookup::TimedOut,
            Err(error) => Lookup::Failed(error.to_string()),
        }
    }

    /// List every repository owned by `username`.
    ///
    /// When `username` is the logged-in account (or the login is unknown), the
    /// authenticated `/user/repos` endpoint is tried first so private
    /// repositories are included. Other accounts, and an authenticated listing
    /// that fails or holds nothing owned by `username`, use the public
    /// `/users/{name}/repos` endpoint.
    pub(crate) async fn list_repos(&self, username: &str) -> Result<Vec<Repo>> {
        let own_account = self
            .current_login()
            .await
            .is_none_or(|login| login.eq_ignore_ascii_case(username));

        if own_account {
            let output = self
                .runner
                .run(&self.list_invocation("/user/repos".to_string()))
                .await?;
            if output.success {
                let owned = owned_by(parse_repo_pages(&output.stdout)?, username);
                if !owned.is_empty() {
                    return Ok(owned);
                }
                debug!("no owned repositories in authenticated listing");
            } else {
                debug!(stderr = %output.stderr.trim(), "authenticated repo listing failed");
            }
        }

        let output = self
            .runner
            .run(&self.list_invocation(format!("/users/{username}/repos")))
            .await?;
        if !output.success {
            return Err(Error::RepoList {
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(owned_by(parse_repo_pages(&output.stdout)?, username))
    }

    /// Build a paginated listing invocation for an endpoint.
    fn list_invocation(&self, endpoint: String) -> Invocation {
        self.base
            .clone()
            .arg("api")
            .arg(endpoint)
            .arg("--paginate")
            .timeout(self.timeouts.list)
    }
}

/// Parse `gh api --paginate` output, which is one JSON array per page back to back.
pub(crate) fn parse_repo_pages(output: &str) -> Result<Vec<Repo>> {
    let mut repos = Vec::new();
    for page in serde_json::Deserializer::from_str(output).into_iter::<Vec<Repo>>() {
        let page = page.map_err(|error| Error::RepoParse { source: error })?;
        repos.extend(page);
    }
    Ok(repos)
}

/// Keep the repositories owned by `username`.
fn owned_by(repos: Vec<Repo>, username: &str) -> Vec<Repo> {
    let total = repos.len();
    let owned: Vec<Repo> = repos
        .into_iter()
        .filter(|repo| repo.is_owned_by(username))
        .collect();
    debug!(total, owned = owned.len(), "listed repositories");
    owned
}

/// Web URL for a repository.
pub(crate) fn repo_url(username: &str, name: &str) -> String {
    format!("https://github.com/{username}/{name}")
}
