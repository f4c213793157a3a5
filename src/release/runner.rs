//! External collaborators run as subprocesses: the test suite and the package installer

use crate::core::error::{FlowError, FlowResult, ReleaseError, ResultExt};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of one test suite run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
  pub passed: bool,
  /// `None` when the runner was killed by a signal
  pub exit_code: Option<i32>,
}

/// Runs the project's test suite
pub trait TestRunner {
  fn run_tests(&self) -> FlowResult<TestOutcome>;
}

/// Installs a published release and reports what the installed command prints
pub trait Installer {
  /// Force-reinstall the package from `source` at `tag`
  fn install(&self, source: &str, tag: &str) -> FlowResult<()>;

  /// Combined stdout and stderr of the installed greeting command
  fn installed_output(&self) -> FlowResult<String>;
}

/// Test runner backed by a configured argv (default `cargo test`)
pub struct CommandTestRunner {
  command: Vec<String>,
  cwd: PathBuf,
}

impl CommandTestRunner {
  pub fn new(command: Vec<String>, cwd: &Path) -> Self {
    Self {
      command,
      cwd: cwd.to_path_buf(),
    }
  }
}

impl TestRunner for CommandTestRunner {
  fn run_tests(&self) -> FlowResult<TestOutcome> {
    let mut cmd = build_command(&self.command, &self.cwd)?;
    println!("   Executing: {}", self.command.join(" "));

    // Test output streams straight to the terminal
    let status = cmd
      .status()
      .with_context(|| format!("Failed to execute test command `{}`", self.command.join(" ")))?;

    debug!("test command exited with {:?}", status.code());
    Ok(TestOutcome {
      passed: status.success(),
      exit_code: status.code(),
    })
  }
}

/// Installer backed by configured commands
///
/// `install` may contain `{remote}` and `{tag}` placeholders; `validate`
/// runs the installed binary with no arguments.
pub struct CommandInstaller {
  install: Vec<String>,
  validate: Vec<String>,
  cwd: PathBuf,
}

impl CommandInstaller {
  pub fn new(install: Vec<String>, validate: Vec<String>, cwd: &Path) -> Self {
    Self {
      install,
      validate,
      cwd: cwd.to_path_buf(),
    }
  }

  /// Install argv with placeholders filled in
  pub fn install_args(&self, source: &str, tag: &str) -> Vec<String> {
    self
      .install
      .iter()
      .map(|arg| arg.replace("{remote}", source).replace("{tag}", tag))
      .collect()
  }
}

impl Installer for CommandInstaller {
  fn install(&self, source: &str, tag: &str) -> FlowResult<()> {
    let args = self.install_args(source, tag);
    let mut cmd = build_command(&args, &self.cwd)?;
    println!("   Executing: {}", args.join(" "));

    let status = cmd.status().map_err(|e| ReleaseError::InstallFailed {
      tag: tag.to_string(),
      reason: format!("could not start `{}`: {}", args[0], e),
    })?;

    if !status.success() {
      return Err(
        ReleaseError::InstallFailed {
          tag: tag.to_string(),
          reason: format!("`{}` exited with status {}", args.join(" "), status.code().unwrap_or(-1)),
        }
        .into(),
      );
    }

    Ok(())
  }

  fn installed_output(&self) -> FlowResult<String> {
    let mut cmd = build_command(&self.validate, &self.cwd)?;
    println!("   Executing: {}", self.validate.join(" "));

    let output = cmd.output().map_err(|e| {
      FlowError::with_help(
        format!("Failed to run installed command `{}`: {}", self.validate.join(" "), e),
        "Check that the installer's bin directory is on PATH.",
      )
    })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    debug!("installed command printed: {}", text.trim_end());
    Ok(text)
  }
}

/// Build a `Command` from argv, rejecting an empty list
fn build_command(argv: &[String], cwd: &Path) -> FlowResult<Command> {
  let (program, args) = argv
    .split_first()
    .ok_or_else(|| FlowError::message("Empty command in release configuration"))?;

  debug!("{} {}", program, args.join(" "));
  let mut cmd = Command::new(program);
  cmd.args(args).current_dir(cwd);
  Ok(cmd)
}
