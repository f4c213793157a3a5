//! The release procedure
//!
//! ```text
//! Start -> PreflightChecked -> TestsRun? -> VersionBumped -> Committed
//!       -> Tagged -> Pushed -> Installed -> Validated -> Done
//! ```
//!
//! Any failing step halts the run and leaves `stage()` at the last step that
//! completed. Nothing is retried and nothing is rolled back.

use super::prompt::Prompter;
use super::runner::{Installer, TestRunner};
use super::stage::ReleaseStage;
use super::validate::check_reported_version;
use crate::core::config::ReleaseConfig;
use crate::core::error::{EnvironmentError, FlowError, FlowResult, ReleaseError};
use crate::core::vcs::Vcs;
use crate::utils::{install_source, path_to_git_format};
use crate::version::{Version, VersionStore, sync_manifest_version};
use log::{debug, info};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Everything the procedure talks to outside its own process
pub struct Collaborators<'a> {
  pub vcs: &'a dyn Vcs,
  pub tests: &'a dyn TestRunner,
  pub installer: &'a dyn Installer,
  pub prompter: &'a dyn Prompter,
}

/// What a release will do, computed without side effects
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
  pub current: Version,
  pub next: Version,
  pub tag: String,
  pub branch: String,
  pub remote: String,
  pub remote_url: String,
}

/// Outcome of a completed release
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
  pub previous: Version,
  pub released: Version,
  pub tag: String,
  pub branch: String,
  pub remote: String,
  pub commit: String,
  pub date: String,
  pub tests_run: bool,
}

/// Runs one release against a repository
pub struct ReleaseOrchestrator<'a> {
  root: PathBuf,
  config: &'a ReleaseConfig,
  store: VersionStore,
  deps: Collaborators<'a>,
  stage: ReleaseStage,
}

impl<'a> ReleaseOrchestrator<'a> {
  /// `root` is the repository work tree; config paths are relative to it
  pub fn new(root: &Path, config: &'a ReleaseConfig, deps: Collaborators<'a>) -> Self {
    let store = VersionStore::new(root.join(&config.version.path), config.version.key.clone());
    Self {
      root: root.to_path_buf(),
      config,
      store,
      deps,
      stage: ReleaseStage::Start,
    }
  }

  /// Last stage that completed
  pub fn stage(&self) -> ReleaseStage {
    self.stage
  }

  pub fn store(&self) -> &VersionStore {
    &self.store
  }

  /// Preflight plus next-version computation, with no side effects
  ///
  /// Used on its own for `--dry-run` and as the first step of `run`.
  pub fn plan(&mut self) -> FlowResult<ReleasePlan> {
    let (branch, remote_url) = self.preflight()?;

    let current = self.store.read()?;
    let next = current.increment_patch()?;
    let tag = next.tag_label();
    debug!("current version {}, next {}", current, next);

    // Checked again right before tagging; failing here keeps the store untouched
    self.ensure_tag_free(&tag)?;

    Ok(ReleasePlan {
      current,
      next,
      tag,
      branch,
      remote: self.config.release.remote.clone(),
      remote_url,
    })
  }

  /// Execute the full release
  pub fn run(&mut self) -> FlowResult<ReleaseSummary> {
    println!("🔍 Preflight checks");
    let plan = self.plan()?;
    println!("   Repository OK, remote '{}' -> {}", plan.remote, plan.remote_url);
    println!("   Releasing {} -> {} on branch {}", plan.current, plan.next, plan.branch);
    println!();

    let tests_run = self.test_gate()?;
    self.change_gate()?;

    self.stage = ReleaseStage::VersionBumped;

    println!("📝 Bumping version to {}", plan.next);
    let commit = self.persist_and_commit(&plan.next)?;
    self.stage = ReleaseStage::Committed;
    println!("   Committed {}", short_sha(&commit));
    println!();

    println!("🏷️  Tagging {}", plan.tag);
    self.ensure_tag_free(&plan.tag)?;
    let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    self
      .deps
      .vcs
      .create_tag(&plan.tag, &format!("Release {} ({})", plan.tag, date))?;
    self.stage = ReleaseStage::Tagged;
    println!();

    println!("🚀 Publishing to '{}'", plan.remote);
    self.push(&plan)?;
    self.stage = ReleaseStage::Pushed;
    println!();

    println!("📦 Installing {} from the remote", plan.tag);
    let source = install_source(&plan.remote_url, &self.root);
    self.deps.installer.install(&source, &plan.tag)?;
    self.stage = ReleaseStage::Installed;
    println!();

    println!("🔎 Validating installed version");
    let output = self.deps.installer.installed_output()?;
    check_reported_version(&plan.next, &output)?;
    self.stage = ReleaseStage::Validated;
    println!("   ✅ Installed command reports {}", plan.next);
    println!();

    self.stage = ReleaseStage::Done;
    info!("released {}", plan.tag);

    Ok(ReleaseSummary {
      previous: plan.current,
      released: plan.next,
      tag: plan.tag,
      branch: plan.branch,
      remote: plan.remote,
      commit,
      date,
      tests_run,
    })
  }

  /// Repository and remote must exist; returns (branch, remote URL)
  fn preflight(&mut self) -> FlowResult<(String, String)> {
    let vcs = self.deps.vcs;

    if !vcs.is_repository()? {
      return Err(EnvironmentError::NotARepository { path: self.root.clone() }.into());
    }

    let remote = &self.config.release.remote;
    let remote_url = vcs
      .remote_url(remote)?
      .ok_or_else(|| EnvironmentError::MissingRemote { remote: remote.clone() })?;

    let branch = vcs.current_branch()?;
    if branch == "HEAD" {
      return Err(EnvironmentError::DetachedHead.into());
    }

    self.stage = ReleaseStage::PreflightChecked;
    Ok((branch, remote_url))
  }

  /// Returns whether tests actually ran
  fn test_gate(&mut self) -> FlowResult<bool> {
    if self.config.tests.skip {
      println!("⏭️  Skipping tests");
      println!();
      return Ok(false);
    }

    println!("🧪 Running tests");
    let outcome = self.deps.tests.run_tests()?;

    if outcome.passed {
      println!("   ✅ Tests passed");
    } else {
      println!("   ❌ Tests failed");
      if !self.deps.prompter.confirm("Tests failed. Release anyway?")? {
        return Err(ReleaseError::TestFailure {
          exit_code: outcome.exit_code,
        }
        .into());
      }
      println!("   ⚠️  Continuing despite failing tests");
    }

    self.stage = ReleaseStage::TestsRun;
    println!();
    Ok(true)
  }

  /// Operator must confirm folding unrelated changes into the release commit
  fn change_gate(&self) -> FlowResult<()> {
    let store_path = self.store_path_for_git();
    let changes: Vec<String> = self
      .deps
      .vcs
      .changed_paths()?
      .into_iter()
      .filter(|p| *p != store_path)
      .collect();

    if changes.is_empty() {
      return Ok(());
    }

    println!("⚠️  Uncommitted changes will be included in the release commit:");
    for path in &changes {
      println!("     {}", path);
    }

    if !self.deps.prompter.confirm("Include these changes in the release?")? {
      return Err(ReleaseError::UncommittedChanges { paths: changes }.into());
    }
    println!();
    Ok(())
  }

  fn persist_and_commit(&self, next: &Version) -> FlowResult<String> {
    self.store.write(next)?;
    println!("   Updated {}", self.config.version.path.display());

    if self.config.release.sync_manifest {
      let manifest = self.root.join(&self.config.release.manifest);
      if sync_manifest_version(&manifest, next)? {
        println!("   Updated {}", self.config.release.manifest.display());
      }
    }

    let vcs = self.deps.vcs;
    vcs.stage_all()?;
    vcs.commit(&format!("Bump version to {}", next))
  }

  fn ensure_tag_free(&self, tag: &str) -> FlowResult<()> {
    if self.deps.vcs.tag_exists(tag)? {
      return Err(ReleaseError::DuplicateTag { tag: tag.to_string() }.into());
    }
    Ok(())
  }

  /// Branch first, then tag; a failed tag push is a partial publish
  fn push(&self, plan: &ReleasePlan) -> FlowResult<()> {
    let vcs = self.deps.vcs;
    vcs.push_branch(&plan.remote, &plan.branch)?;

    vcs.push_tag(&plan.remote, &plan.tag).map_err(|err| -> FlowError {
      ReleaseError::PartialPublish {
        remote: plan.remote.clone(),
        branch: plan.branch.clone(),
        tag: plan.tag.clone(),
        reason: err.to_string(),
      }
      .into()
    })
  }

  /// Store path as `git status` prints it
  fn store_path_for_git(&self) -> String {
    let normalized: PathBuf = self
      .config
      .version
      .path
      .components()
      .filter(|c| !matches!(c, Component::CurDir))
      .collect();
    path_to_git_format(&normalized)
  }
}

fn short_sha(sha: &str) -> &str {
  sha.get(..7).unwrap_or(sha)
}
