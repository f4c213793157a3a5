//! Release operations for SystemGit (status, commits, tags, remotes, pushes)

use super::Vcs;
use super::system_git::SystemGit;
use crate::core::error::{FlowResult, GitError};
use log::debug;

impl SystemGit {
  /// List all remotes
  pub fn list_remotes(&self) -> FlowResult<Vec<(String, String)>> {
    let output = self.output(&["remote", "-v"], "Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut remotes = Vec::new();

    for line in stdout.lines() {
      // Format: "origin  git@github.com:user/repo.git (fetch)"
      let parts: Vec<&str> = line.split_whitespace().collect();
      if parts.len() >= 2 && line.contains("(fetch)") {
        remotes.push((parts[0].to_string(), parts[1].to_string()));
      }
    }

    Ok(remotes)
  }

  /// Push a refspec, mapping rejections to `GitError::PushFailed`
  fn push_refspec(&self, remote: &str, refspec: &str) -> FlowResult<()> {
    println!("   Pushing {} to '{}'...", refspec, remote);

    let output = self.output(&["push", remote, refspec], "Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(
        GitError::PushFailed {
          remote: remote.to_string(),
          refspec: refspec.to_string(),
          reason: stderr.to_string(),
        }
        .into(),
      );
    }

    println!("   ✅ Pushed {} to {}", refspec, remote);
    Ok(())
  }
}

impl Vcs for SystemGit {
  fn is_repository(&self) -> FlowResult<bool> {
    let output = self.output(&["rev-parse", "--is-inside-work-tree"], "Failed to execute git rev-parse")?;
    Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
  }

  fn remote_url(&self, remote: &str) -> FlowResult<Option<String>> {
    let remotes = self.list_remotes()?;
    Ok(remotes.into_iter().find(|(n, _)| n == remote).map(|(_, url)| url))
  }

  fn current_branch(&self) -> FlowResult<String> {
    let output = self.output(&["rev-parse", "--abbrev-ref", "HEAD"], "Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string()); // Unborn or detached HEAD
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  fn changed_paths(&self) -> FlowResult<Vec<String>> {
    let stdout = self.run(
      &["status", "--porcelain=v1", "-z", "--untracked-files=all"],
      "Failed to get working tree status",
    )?;
    Ok(parse_porcelain_z(&stdout))
  }

  fn stage_all(&self) -> FlowResult<()> {
    self.run(&["add", "--all"], "Failed to stage changes")?;
    Ok(())
  }

  fn commit(&self, message: &str) -> FlowResult<String> {
    self.run(&["commit", "-m", message], "Failed to create commit")?;
    let sha = self.head_commit()?;
    debug!("created commit {}", sha);
    Ok(sha)
  }

  fn tag_exists(&self, tag: &str) -> FlowResult<bool> {
    let refname = format!("refs/tags/{}", tag);
    let output = self.output(&["rev-parse", "-q", "--verify", &refname], "Failed to look up tag")?;
    Ok(output.status.success())
  }

  fn create_tag(&self, tag: &str, message: &str) -> FlowResult<()> {
    self.run(&["tag", "-a", tag, "-m", message], "Failed to create tag")?;
    Ok(())
  }

  fn push_branch(&self, remote: &str, branch: &str) -> FlowResult<()> {
    self.push_refspec(remote, branch)
  }

  fn push_tag(&self, remote: &str, tag: &str) -> FlowResult<()> {
    self.push_refspec(remote, &format!("refs/tags/{}", tag))
  }
}

/// Parse `git status --porcelain=v1 -z` output into changed paths
///
/// Entries are `XY <path>` separated by NUL. Renames and copies carry their
/// source path as an extra NUL-separated field, which is skipped.
fn parse_porcelain_z(stdout: &str) -> Vec<String> {
  let mut paths = Vec::new();
  let mut fields = stdout.split('\0');

  while let Some(entry) = fields.next() {
    if entry.len() < 4 {
      continue;
    }
    let (status, path) = entry.split_at(3);
    paths.push(path.to_string());

    if status.starts_with('R') || status.starts_with('C') {
      fields.next();
    }
  }

  paths
}
