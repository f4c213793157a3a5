//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Release config used by default: passing tests, an "installer" that checks
/// the tag reached the remote, and a validate command that reports 0.1.1
pub const DEFAULT_CONFIG: &str = r#"[tests]
command = ["true"]

[install]
command = ["git", "ls-remote", "--exit-code", "{remote}", "{tag}"]
validate = ["echo", "Hello from flow! (version 0.1.1)"]
"#;

/// A working clone plus the bare repository it publishes to
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  pub remote: PathBuf,
}

impl TestRepo {
  /// Repository at `version = "0.1.0"` with DEFAULT_CONFIG, pushed to `origin`
  pub fn new() -> Result<Self> {
    Self::with_config(DEFAULT_CONFIG)
  }

  pub fn with_config(release_toml: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("work");
    let remote = root.path().join("remote.git");
    std::fs::create_dir_all(&path)?;

    git(root.path(), &["init", "--bare", "--initial-branch=main", "remote.git"])?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["remote", "add", "origin", &remote.to_string_lossy()])?;

    std::fs::write(path.join("version.toml"), "version = \"0.1.0\"\n")?;
    std::fs::write(path.join("release.toml"), release_toml)?;
    std::fs::write(path.join("README.md"), "# flow\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;
    git(&path, &["push", "-u", "origin", "main"])?;

    Ok(Self {
      _root: root,
      path,
      remote,
    })
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    Ok(std::fs::write(self.path.join(path), content)?)
  }

  /// Tags known to the bare remote
  pub fn remote_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.remote, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  pub fn local_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Subject line of the latest commit
  pub fn head_subject(&self) -> Result<String> {
    let output = git(&self.path, &["log", "-1", "--format=%s"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Files touched by the latest commit
  pub fn head_files(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["show", "--name-only", "--format=", "HEAD"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run flow-release, feeding `stdin` to its prompts (EOF when `None`)
///
/// Does not fail on a non-zero exit; callers assert on the status.
pub fn run_flow_release(cwd: &Path, args: &[&str], stdin: Option<&str>) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_flow-release");

  let mut child = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run flow-release")?;

  // Dropping the handle closes stdin
  if let Some(mut handle) = child.stdin.take()
    && let Some(input) = stdin
  {
    handle.write_all(input.as_bytes())?;
  }

  child.wait_with_output().context("Failed to wait for flow-release")
}

/// Run the flow greeting binary
pub fn run_flow(args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_flow"))
    .args(args)
    .output()
    .context("Failed to run flow")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
