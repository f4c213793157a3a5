pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::FlowResult;

/// Version-control operations the release procedure depends on
///
/// `SystemGit` is the production implementation. Tests substitute fakes to
/// drive the orchestrator through failure paths without a real remote.
pub trait Vcs {
  /// Whether the working directory is inside a git work tree
  fn is_repository(&self) -> FlowResult<bool>;

  /// URL of a named remote, `None` if it is not configured
  fn remote_url(&self, remote: &str) -> FlowResult<Option<String>>;

  /// Current branch name, `"HEAD"` when detached
  fn current_branch(&self) -> FlowResult<String>;

  /// Paths (relative to the work tree root) with staged, unstaged or untracked changes
  fn changed_paths(&self) -> FlowResult<Vec<String>>;

  /// Stage every working-tree change, including untracked files
  fn stage_all(&self) -> FlowResult<()>;

  /// Commit the index and return the new commit SHA
  fn commit(&self, message: &str) -> FlowResult<String>;

  /// Whether a tag with exactly this name exists locally
  fn tag_exists(&self, tag: &str) -> FlowResult<bool>;

  /// Create an annotated tag at HEAD
  fn create_tag(&self, tag: &str, message: &str) -> FlowResult<()>;

  /// Push a branch to a remote
  fn push_branch(&self, remote: &str, branch: &str) -> FlowResult<()>;

  /// Push a single tag to a remote
  fn push_tag(&self, remote: &str, tag: &str) -> FlowResult<()>;
}
