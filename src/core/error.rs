//! Error types for flow-cli with contextual messages and exit codes
//!
//! Every failure of the release procedure halts it immediately. The variants
//! here keep those failures distinguishable on screen and in the exit status.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for flow-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed version store)
  User = 1,
  /// System error (git, I/O, installer)
  System = 2,
  /// Validation failure (tests, duplicate tag, version mismatch)
  Validation = 3,
  /// Operator declined a confirmation gate
  Aborted = 4,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for flow-cli
#[derive(Debug)]
pub enum FlowError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Version store errors
  Version(VersionError),

  /// Preflight environment errors
  Environment(EnvironmentError),

  /// Release procedure failures
  Release(ReleaseError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FlowError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FlowError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    FlowError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FlowError::Message { message, context, help } => FlowError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      FlowError::Io(err) => FlowError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FlowError::Config(_) => ExitCode::User,
      FlowError::Git(_) => ExitCode::System,
      FlowError::Version(_) => ExitCode::User,
      FlowError::Environment(_) => ExitCode::User,
      FlowError::Release(e) => e.exit_code(),
      FlowError::Io(_) => ExitCode::System,
      FlowError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FlowError::Config(e) => e.help_message(),
      FlowError::Git(e) => e.help_message(),
      FlowError::Version(e) => e.help_message(),
      FlowError::Environment(e) => e.help_message(),
      FlowError::Release(e) => e.help_message(),
      FlowError::Message { help, .. } => help.clone(),
      FlowError::Io(_) => None,
    }
  }
}

impl fmt::Display for FlowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FlowError::Config(e) => write!(f, "{}", e),
      FlowError::Git(e) => write!(f, "{}", e),
      FlowError::Version(e) => write!(f, "{}", e),
      FlowError::Environment(e) => write!(f, "{}", e),
      FlowError::Release(e) => write!(f, "{}", e),
      FlowError::Io(e) => write!(f, "I/O error: {}", e),
      FlowError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FlowError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FlowError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for FlowError {
  fn from(err: io::Error) -> Self {
    FlowError::Io(err)
  }
}

impl From<String> for FlowError {
  fn from(msg: String) -> Self {
    FlowError::message(msg)
  }
}

impl From<&str> for FlowError {
  fn from(msg: &str) -> Self {
    FlowError::message(msg)
  }
}

impl From<ConfigError> for FlowError {
  fn from(err: ConfigError) -> Self {
    FlowError::Config(err)
  }
}

impl From<GitError> for FlowError {
  fn from(err: GitError) -> Self {
    FlowError::Git(err)
  }
}

impl From<VersionError> for FlowError {
  fn from(err: VersionError) -> Self {
    FlowError::Version(err)
  }
}

impl From<EnvironmentError> for FlowError {
  fn from(err: EnvironmentError) -> Self {
    FlowError::Environment(err)
  }
}

impl From<ReleaseError> for FlowError {
  fn from(err: ReleaseError) -> Self {
    FlowError::Release(err)
  }
}

impl From<toml_edit::TomlError> for FlowError {
  fn from(err: toml_edit::TomlError) -> Self {
    FlowError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for FlowError {
  fn from(err: toml_edit::de::Error) -> Self {
    FlowError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for FlowError {
  fn from(err: serde_json::Error) -> Self {
    FlowError::message(format!("JSON error: {}", err))
  }
}

impl From<anyhow::Error> for FlowError {
  fn from(err: anyhow::Error) -> Self {
    FlowError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// An explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// A field holds a value the release procedure cannot use
  Invalid { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some(
        "Drop the --config flag to use release.toml from the working directory, or built-in defaults.".to_string(),
      ),
      ConfigError::Invalid { field, .. } => Some(format!("Fix or remove `{}` in release.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => write!(f, "Config file not found: {}", path.display()),
      ConfigError::Invalid { field, reason } => write!(f, "Invalid config value for {}: {}", field, reason),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull and rebase, then release again.".to_string())
        } else if reason.to_lowercase().contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key or token has push access to the remote.".to_string())
        } else {
          None
        }
      }
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason.trim_end())
      }
    }
  }
}

/// Version store errors
#[derive(Debug)]
pub enum VersionError {
  /// Text is not `major.minor.patch` with numeric components
  Parse { input: String },

  /// The store resource does not hold exactly one usable assignment
  Store { path: PathBuf, reason: String },

  /// The patch component cannot be incremented further
  PatchOverflow { version: String },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::Parse { .. } => Some("Versions must look like 1.2.3 (three numeric components).".to_string()),
      VersionError::Store { path, .. } => Some(format!(
        "{} must contain exactly one line like: version = \"0.1.0\"",
        path.display()
      )),
      VersionError::PatchOverflow { .. } => {
        Some("Bump the minor version in the version store by hand.".to_string())
      }
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::Parse { input } => write!(f, "Malformed version string: '{}'", input),
      VersionError::Store { path, reason } => {
        write!(f, "Unreadable version store {}: {}", path.display(), reason)
      }
      VersionError::PatchOverflow { version } => {
        write!(f, "Cannot release after {}: patch component is at its maximum", version)
      }
    }
  }
}

/// Preflight failures. Fatal, never retried.
#[derive(Debug)]
pub enum EnvironmentError {
  /// Working directory is not inside a git work tree
  NotARepository { path: PathBuf },

  /// No URL configured for the publishing remote
  MissingRemote { remote: String },

  /// HEAD does not point at a branch, so there is nothing to push
  DetachedHead,
}

impl EnvironmentError {
  fn help_message(&self) -> Option<String> {
    match self {
      EnvironmentError::NotARepository { .. } => {
        Some("Run flow-release from inside the project's git checkout.".to_string())
      }
      EnvironmentError::MissingRemote { remote } => Some(format!(
        "Add one with: git remote add {} <url>  (or pick another with --remote)",
        remote
      )),
      EnvironmentError::DetachedHead => Some("Check out the branch to release from, e.g. git switch main".to_string()),
    }
  }
}

impl fmt::Display for EnvironmentError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EnvironmentError::NotARepository { path } => {
        write!(f, "Environment error: {} is not a git repository", path.display())
      }
      EnvironmentError::MissingRemote { remote } => {
        write!(f, "Environment error: no remote named '{}' is configured", remote)
      }
      EnvironmentError::DetachedHead => write!(f, "Environment error: HEAD is detached, not on a branch"),
    }
  }
}

/// Failures of individual release steps
#[derive(Debug)]
pub enum ReleaseError {
  /// Test suite failed and the operator did not override
  TestFailure { exit_code: Option<i32> },

  /// Operator declined to fold uncommitted changes into the release commit
  UncommittedChanges { paths: Vec<String> },

  /// The tag for the next version already exists
  DuplicateTag { tag: String },

  /// Branch reached the remote but the tag did not
  PartialPublish {
    remote: String,
    branch: String,
    tag: String,
    reason: String,
  },

  /// Installing the published package failed
  InstallFailed { tag: String, reason: String },

  /// Installed command does not report the released version
  VersionMismatch { expected: String, found: Option<String> },
}

impl ReleaseError {
  fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::TestFailure { .. } => ExitCode::Validation,
      ReleaseError::UncommittedChanges { .. } => ExitCode::Aborted,
      ReleaseError::DuplicateTag { .. } => ExitCode::Validation,
      ReleaseError::PartialPublish { .. } => ExitCode::System,
      ReleaseError::InstallFailed { .. } => ExitCode::System,
      ReleaseError::VersionMismatch { .. } => ExitCode::Validation,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::TestFailure { .. } => {
        Some("Fix the failing tests, or re-run with --skip-tests if you know what you're doing.".to_string())
      }
      ReleaseError::UncommittedChanges { .. } => {
        Some("Commit or stash the listed changes, then release again.".to_string())
      }
      ReleaseError::DuplicateTag { tag } => Some(format!(
        "A previous or concurrent release already created {}. Inspect it with: git show {}",
        tag, tag
      )),
      ReleaseError::PartialPublish { remote, tag, .. } => Some(format!(
        "The branch is published but the tag is not. Finish by hand with: git push {} {}",
        remote, tag
      )),
      ReleaseError::InstallFailed { .. } => {
        Some("The release is published. Retry the install manually to validate it.".to_string())
      }
      ReleaseError::VersionMismatch { .. } => Some(
        "The release is published but unvalidated. Check the installed binary and the tagged version store."
          .to_string(),
      ),
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::TestFailure { exit_code } => match exit_code {
        Some(code) => write!(f, "Test failure: test suite exited with status {}", code),
        None => write!(f, "Test failure: test suite was terminated by a signal"),
      },
      ReleaseError::UncommittedChanges { paths } => write!(
        f,
        "Release aborted: {} uncommitted change(s) not confirmed for the release commit",
        paths.len()
      ),
      ReleaseError::DuplicateTag { tag } => write!(f, "Duplicate tag: {} already exists", tag),
      ReleaseError::PartialPublish {
        remote,
        branch,
        tag,
        reason,
      } => write!(
        f,
        "Partial publish: pushed {} to {} but pushing tag {} failed: {}",
        branch,
        remote,
        tag,
        reason.trim_end()
      ),
      ReleaseError::InstallFailed { tag, reason } => {
        write!(f, "Install of {} failed: {}", tag, reason.trim_end())
      }
      ReleaseError::VersionMismatch { expected, found } => match found {
        Some(found) => write!(
          f,
          "Version mismatch: installed command reports {}, expected {}",
          found, expected
        ),
        None => write!(
          f,
          "Version mismatch: installed command output has no version, expected {}",
          expected
        ),
      },
    }
  }
}

/// Result type alias for flow-cli
pub type FlowResult<T> = Result<T, FlowError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> FlowResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FlowResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FlowError>,
{
  fn context(self, ctx: impl Into<String>) -> FlowResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> FlowResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FlowError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exit_codes_distinguish_failures() {
    let declined: FlowError = ReleaseError::UncommittedChanges { paths: vec![] }.into();
    let duplicate: FlowError = ReleaseError::DuplicateTag { tag: "v0.1.1".into() }.into();
    let env: FlowError = EnvironmentError::MissingRemote {
      remote: "origin".into(),
    }
    .into();

    assert_eq!(declined.exit_code(), ExitCode::Aborted);
    assert_eq!(duplicate.exit_code(), ExitCode::Validation);
    assert_eq!(env.exit_code(), ExitCode::User);
    assert_ne!(declined.exit_code().as_i32(), 0);
  }

  #[test]
  fn test_messages_name_the_failure() {
    let err: FlowError = ReleaseError::VersionMismatch {
      expected: "0.1.1".into(),
      found: Some("0.1.0".into()),
    }
    .into();
    assert!(err.to_string().starts_with("Version mismatch"));

    let err: FlowError = VersionError::Parse { input: "1.2".into() }.into();
    assert!(err.to_string().contains("'1.2'"));
  }

  #[test]
  fn test_partial_publish_help_names_tag() {
    let err: FlowError = ReleaseError::PartialPublish {
      remote: "origin".into(),
      branch: "main".into(),
      tag: "v1.0.1".into(),
      reason: "network down".into(),
    }
    .into();
    assert_eq!(err.help_message().as_deref(), Some(
      "The branch is published but the tag is not. Finish by hand with: git push origin v1.0.1"
    ));
  }

  #[test]
  fn test_context_wraps_io_error() {
    let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
    let err = result.context("Failed to read version.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read version.toml"));
  }
}
