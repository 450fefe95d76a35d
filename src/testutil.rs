//! Test utilities for directory fixtures and scripted external commands.
//!
//! `TestFixture` builds an isolated directory tree; `FakeRunner` stands in for
//! `gh` and `yt-dlp`, answering invocations from a script and recording them.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use tempfile::TempDir;

use crate::{
    config::Config,
    error::{Error, Result},
    process::{CommandOutput, CommandRunner, Invocation},
};

/// Test fixture for creating isolated directory trees.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    _root: TempDir,
    /// Canonical path of the root, as commands resolve it.
    root: PathBuf,
}

impl TestFixture {
    /// Create a new fixture with an empty root directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let path = dunce::canonicalize(root.path()).expect("canonical temp dir");
        Self {
            _root: root,
            root: path,
        }
    }

    /// Add a directory (and any parents) below the root.
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.root.join(relative)).expect("create dir");
        self
    }

    /// Add a file below the root, creating parent directories.
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        self
    }

    /// Get the root directory path, canonicalized.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a file exists below the root.
    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a default config backed by a missing file in a temp directory.
pub fn test_config() -> (TempDir, Config) {
    let dir = TempDir::new().expect("create temp dir");
    let config = Config::load_from(&dir.path().join("dirkit.toml")).expect("default config");
    (dir, config)
}

/// Render one repository object as the GitHub API would.
pub fn repo_json(name: &str, owner: &str, description: Option<&str>) -> String {
    serde_json::json!({
        "name": name,
        "html_url": format!("https://github.com/{owner}/{name}"),
        "clone_url": format!("https://github.com/{owner}/{name}.git"),
        "description": description,
        "owner": { "login": owner },
    })
    .to_string()
}

/// Scripted reply for one invocation.
enum Reply {
    /// Return this output.
    Output(CommandOutput),
    /// Fail as if the time limit elapsed.
    Timeout,
}

/// Script entry: a reply plus an optional file to create as a side effect.
struct Step {
    /// Reply to return.
    reply: Reply,
    /// File written before replying, mimicking tool output.
    creates: Option<PathBuf>,
}

/// A `CommandRunner` that answers from a script keyed by command line.
///
/// Keys are the program and arguments joined with single spaces. Unscripted
/// invocations fail as if the program were not installed.
#[derive(Default)]
pub struct FakeRunner {
    /// Replies keyed by command line.
    script: HashMap<String, Step>,
    /// Command lines seen, in order.
    calls: Mutex<Vec<String>>,
    /// Time limits seen, in order.
    limits: Mutex<Vec<Option<Duration>>>,
}

impl FakeRunner {
    /// Create a runner with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `command` with `output`.
    pub fn on(mut self, command: &str, output: CommandOutput) -> Self {
        self.script.insert(
            command.to_string(),
            Step {
                reply: Reply::Output(output),
                creates: None,
            },
        );
        self
    }

    /// Reply to `command` with `output` after creating `path`.
    pub fn on_creating(mut self, command: &str, output: CommandOutput, path: PathBuf) -> Self {
        self.script.insert(
            command.to_string(),
            Step {
                reply: Reply::Output(output),
                creates: Some(path),
            },
        );
        self
    }

    /// Time out on `command`.
    pub fn on_timeout(mut self, command: &str) -> Self {
        self.script.insert(
            command.to_string(),
            Step {
                reply: Reply::Timeout,
                creates: None,
            },
        );
        self
    }

    /// Successful output with the given stdout.
    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given stderr.
    pub fn fail(stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    /// Command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Time limits of the invocations run so far.
    pub fn limits(&self) -> Vec<Option<Duration>> {
        self.limits.lock().expect("limits lock").clone()
    }
}

/// Join an invocation into its script key.
fn command_key(invocation: &Invocation) -> String {
    let mut words = vec![invocation.program()];
    words.extend(invocation.arguments().iter().map(String::as_str));
    words.join(" ")
}

impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let key = command_key(invocation);
        self.calls.lock().expect("calls lock").push(key.clone());
        self.limits
            .lock()
            .expect("limits lock")
            .push(invocation.time_limit());

        let Some(step) = self.script.get(&key) else {
            return Err(Error::Spawn {
                program: invocation.program().to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        };

        if let Some(path) = &step.creates {
            fs::write(path, b"thumbnail").expect("write scripted output");
        }

        match &step.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::Timeout => Err(Error::Timeout {
                program: invocation.program().to_string(),
                timeout: invocation.time_limit().unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_files_and_directories() {
        let fixture = TestFixture::new()
            .with_dir("project")
            .with_file("nested/file [id].mp4", "data");

        assert!(fixture.exists("project"));
        assert!(fixture.exists("nested/file [id].mp4"));
    }

    #[tokio::test]
    async fn unscripted_commands_look_missing() {
        let runner = FakeRunner::new();
        let invocation = Invocation::new(&["gh".to_string()]).arg("auth");
        let error = runner.run(&invocation).await.expect_err("unscripted");
        assert!(crate::process::is_not_found(&error));
        assert_eq!(runner.calls(), ["gh auth"]);
    }
}
