//! System git backend - zero dependencies
//!
//! Uses git porcelain and plumbing commands through a single command builder:
//! - Every invocation runs with `-C <repo>` so the process cwd never matters
//! - Isolated environment (only PATH, HOME, SSH agent and git identity survive)
//! - Every command is logged at debug level before it runs

use crate::core::error::{FlowResult, GitError, ResultExt};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables that survive `env_clear`
///
/// Identity variables let CI set the commit author; the agent socket lets
/// pushes over SSH authenticate.
const PASSTHROUGH_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "SSH_AUTH_SOCK",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Point a backend at a directory
  ///
  /// No subprocess runs here; whether the directory is actually a repository
  /// is answered by `is_repository`, which the release preflight calls.
  pub fn new(path: &Path) -> Self {
    Self {
      repo_path: path.to_path_buf(),
    }
  }

  /// Work tree root of the repository
  pub fn work_tree(&self) -> FlowResult<PathBuf> {
    let stdout = self.run(&["rev-parse", "--show-toplevel"], "Failed to execute git rev-parse")?;
    Ok(PathBuf::from(stdout.trim()))
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> FlowResult<String> {
    let stdout = self.run(&["rev-parse", "HEAD"], "Failed to get HEAD commit")?;
    Ok(stdout.trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables except `PASSTHROUGH_ENV`
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    // Set working directory
    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust ambient GIT_* state)
    cmd.env_clear();
    for key in PASSTHROUGH_ENV {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
    cmd.arg("-c").arg("tag.gpgSign=false");
    cmd.arg("-c").arg("commit.gpgSign=false");

    cmd
  }

  /// Run a git command to completion and capture its output
  pub(crate) fn output(&self, args: &[&str], what: &str) -> FlowResult<Output> {
    debug!("git {}", args.join(" "));
    self.git_cmd().args(args).output().context(what.to_string())
  }

  /// Run a git command that must succeed, returning stdout
  pub(crate) fn run(&self, args: &[&str], what: &str) -> FlowResult<String> {
    let output = self.output(args, what)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(
        GitError::CommandFailed {
          command: format!("git {}", args.join(" ")),
          stderr: stderr.to_string(),
        }
        .into(),
      );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}
