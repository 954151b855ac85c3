//! Commit and push generated charts with `git`
//!
//! Two workflows are supported:
//! - [`PublishMode::Force`]: add, commit, rename the branch and force-push.
//!   Any failing command aborts.
//! - [`PublishMode::Sync`]: check the repository state first, commit only when
//!   the staged file changed, rebase onto the remote and push. Problems are
//!   reported as a [`PublishOutcome`] instead of an error.

use crate::core::error::PublishError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of one `git` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl GitOutput {
    /// Output of a command that exited with `code` and printed nothing
    #[must_use]
    pub const fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Whether the command exited with status 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Something that can run `git` subcommands
pub trait GitRunner {
    /// Run `git <args>` and capture its output
    ///
    /// # Errors
    /// Returns an error only if the process could not be started; a non-zero
    /// exit is reported through [`GitOutput::code`].
    fn run(&mut self, args: &[&str]) -> Result<GitOutput, PublishError>;

    /// Directory the commands run in, used to resolve `git rev-parse --git-dir`
    fn current_dir(&self) -> Option<&Path> {
        None
    }
}

/// Runs the `git` executable found on `PATH` in the process working directory
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl SystemGit {
    /// Create a runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GitRunner for SystemGit {
    fn run(&mut self, args: &[&str]) -> Result<GitOutput, PublishError> {
        let output = Command::new("git")
            .args(args)
            .output()
            .map_err(|source| PublishError::Spawn {
                command: command_line(args),
                source,
            })?;
        Ok(GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Which git workflow to run after writing a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Commit and force-push, failing on the first error
    Force,
    /// Check state, commit if changed, rebase and push
    Sync,
}

/// How a publish attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The working directory is not inside a git repository
    NotARepository,
    /// A rebase is in progress and must be finished by hand
    RebaseInProgress,
    /// The branch was pushed
    Pushed {
        /// Whether a new commit was created
        committed: bool,
    },
    /// A git command failed; the message says which
    Failed(String),
}

/// Commits and pushes files to `<remote> <branch>`
pub struct Publisher<'g> {
    git: &'g mut dyn GitRunner,
    remote: String,
    branch: String,
}

impl<'g> Publisher<'g> {
    /// Publisher pushing to `remote`/`branch`
    #[must_use]
    pub fn new(git: &'g mut dyn GitRunner, remote: &str, branch: &str) -> Self {
        Self {
            git,
            remote: remote.to_string(),
            branch: branch.to_string(),
        }
    }

    /// Publish `file` with the given workflow
    ///
    /// # Errors
    /// In force mode, returns the first failing command. Sync mode only fails
    /// if `git` cannot be started at all.
    pub fn publish(&mut self, file: &Path, mode: PublishMode) -> Result<PublishOutcome, PublishError> {
        match mode {
            PublishMode::Force => {
                self.force_push(file)?;
                Ok(PublishOutcome::Pushed { committed: true })
            }
            PublishMode::Sync => self.sync(file),
        }
    }

    /// Add, commit, `branch -M` and `push --force`
    ///
    /// # Errors
    /// Returns the first command that fails or cannot be started
    pub fn force_push(&mut self, file: &Path) -> Result<(), PublishError> {
        let path = file.to_string_lossy();
        let message = format!("Auto-update chart HTML ({})", display_name(file));
        let (remote, branch) = (self.remote.clone(), self.branch.clone());
        self.checked(&["add", &path])?;
        self.checked(&["commit", "-m", &message])?;
        self.checked(&["branch", "-M", &branch])?;
        self.checked(&["push", &remote, &branch, "--force"])?;
        crate::info!("Pushed {} to {remote}/{branch}", display_name(file));
        Ok(())
    }

    /// Commit if changed, rebase onto the remote and push
    ///
    /// # Errors
    /// Returns an error only if `git` cannot be started
    pub fn sync(&mut self, file: &Path) -> Result<PublishOutcome, PublishError> {
        if !self.in_work_tree()? {
            crate::warn!("No git repository found. Initialise one and add a remote, e.g.:");
            crate::warn!("  git init");
            crate::warn!("  git branch -M {}", self.branch);
            crate::warn!("  git remote add {} https://github.com/<USER>/<REPO>.git", self.remote);
            return Ok(PublishOutcome::NotARepository);
        }
        if self.rebase_in_progress()? {
            crate::warn!(
                "A rebase is in progress. Resolve conflicts and run `git rebase --continue` first."
            );
            return Ok(PublishOutcome::RebaseInProgress);
        }

        match self.sync_steps(file) {
            Ok(committed) => {
                crate::info!("Pushed changes to {}/{}", self.remote, self.branch);
                Ok(PublishOutcome::Pushed { committed })
            }
            Err(err @ PublishError::CommandFailed { .. }) => {
                crate::error!("Git command failed: {err}");
                crate::error!("Check the remote, the branch name and your credentials (SSH/token).");
                Ok(PublishOutcome::Failed(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    fn sync_steps(&mut self, file: &Path) -> Result<bool, PublishError> {
        let path = file.to_string_lossy();
        let (remote, branch) = (self.remote.clone(), self.branch.clone());

        self.checked(&["add", &path])?;

        let committed = if self.echoed(&["diff", "--cached", "--quiet"])?.success() {
            crate::info!("No changes to commit.");
            false
        } else {
            let message = format!("Auto-update network chart HTML ({})", display_name(file));
            self.checked(&["commit", "-m", &message])?;
            true
        };

        self.echoed(&["fetch", &remote])?;

        if !self.echoed(&["pull", "--rebase", &remote, &branch])?.success() {
            self.checked(&[
                "pull",
                "--rebase",
                "--allow-unrelated-histories",
                &remote,
                &branch,
            ])?;
        }

        self.checked(&["push", &remote, &branch])?;
        Ok(committed)
    }

    fn in_work_tree(&mut self) -> Result<bool, PublishError> {
        let out = self.git.run(&["rev-parse", "--is-inside-work-tree"])?;
        Ok(out.success() && out.stdout.trim() == "true")
    }

    fn rebase_in_progress(&mut self) -> Result<bool, PublishError> {
        let out = self.git.run(&["rev-parse", "--git-dir"])?;
        if !out.success() {
            return Ok(false);
        }
        let mut git_dir = PathBuf::from(out.stdout.trim());
        if git_dir.is_relative() {
            if let Some(dir) = self.git.current_dir() {
                git_dir = dir.join(git_dir);
            }
        }
        Ok(["rebase-merge", "rebase-apply"]
            .iter()
            .any(|marker| git_dir.join(marker).exists()))
    }

    /// Echo and run, whatever the exit status
    fn echoed(&mut self, args: &[&str]) -> Result<GitOutput, PublishError> {
        crate::info!("$ {}", command_line(args));
        let out = self.git.run(args)?;
        if !out.stdout.trim().is_empty() {
            crate::debug!("{}", out.stdout.trim_end());
        }
        if !out.success() && !out.stderr.trim().is_empty() {
            crate::warn!("{}", out.stderr.trim_end());
        }
        Ok(out)
    }

    /// Echo and run, failing on a non-zero exit
    fn checked(&mut self, args: &[&str]) -> Result<GitOutput, PublishError> {
        let out = self.echoed(args)?;
        if out.success() {
            Ok(out)
        } else {
            Err(PublishError::CommandFailed {
                command: command_line(args),
                code: out.code,
            })
        }
    }
}

fn command_line(args: &[&str]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        if arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .unwrap_or(file.as_os_str())
        .to_string_lossy()
        .into_owned()
}
