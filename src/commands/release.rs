//! `flow-release` command implementation

use crate::core::config::ReleaseConfig;
use crate::core::error::FlowResult;
use crate::core::vcs::SystemGit;
use crate::release::{
  Collaborators, CommandInstaller, CommandTestRunner, FixedAnswer, Prompter, ReleaseOrchestrator, ReleasePlan,
  StdinPrompter,
};
use log::debug;
use std::env;
use std::path::{Path, PathBuf};

/// Command-line choices that shape one run
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
  pub skip_tests: bool,
  pub yes: bool,
  pub dry_run: bool,
  pub json: bool,
  pub remote: Option<String>,
  pub config: Option<PathBuf>,
}

/// Run the release procedure from the current directory
pub fn run_release(opts: &ReleaseOptions) -> FlowResult<()> {
  let cwd = env::current_dir()?;

  // Config paths are relative to the work tree, wherever the command runs from
  let root = SystemGit::new(&cwd).work_tree().unwrap_or_else(|_| cwd.clone());
  debug!("repository root: {}", root.display());

  let config = load_config(&root, opts)?;
  let vcs = SystemGit::new(&root);
  let tests = CommandTestRunner::new(config.tests.command.clone(), &root);
  let installer = CommandInstaller::new(config.install.command.clone(), config.install.validate.clone(), &root);
  let prompter: Box<dyn Prompter> = if opts.yes {
    Box::new(FixedAnswer(true))
  } else {
    Box::new(StdinPrompter)
  };

  let mut release = ReleaseOrchestrator::new(
    &root,
    &config,
    Collaborators {
      vcs: &vcs,
      tests: &tests,
      installer: &installer,
      prompter: prompter.as_ref(),
    },
  );

  if opts.dry_run {
    let plan = release.plan()?;
    if opts.json {
      println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
      print_plan(&plan, &config);
    }
    return Ok(());
  }

  match release.run() {
    Ok(summary) => {
      if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
      } else {
        println!("🎉 Released {} ({} -> {})", summary.tag, summary.previous, summary.released);
        println!("   Branch: {} on '{}'", summary.branch, summary.remote);
        println!("   Commit: {}", summary.commit);
      }
      Ok(())
    }
    Err(err) => {
      let stage = release.stage();
      eprintln!("⚠️  Stopped after: {}", stage);
      if stage.is_published() {
        eprintln!("   The release is already on the remote; it was not rolled back.");
      } else if stage.has_local_changes() {
        eprintln!("   Local commit/tag were created but nothing was pushed.");
      }
      Err(err)
    }
  }
}

/// Config file (explicit or discovered) with command-line overrides applied
fn load_config(root: &Path, opts: &ReleaseOptions) -> FlowResult<ReleaseConfig> {
  let mut config = match &opts.config {
    Some(path) => ReleaseConfig::load_file(path)?,
    None => ReleaseConfig::load(root)?,
  };

  if opts.skip_tests {
    config.tests.skip = true;
  }
  if let Some(remote) = &opts.remote {
    config.release.remote = remote.clone();
  }

  config.validate()?;
  Ok(config)
}

fn print_plan(plan: &ReleasePlan, config: &ReleaseConfig) {
  println!("📦 Release plan");
  println!();
  println!("  Current:  {}", plan.current);
  println!("  Next:     {}", plan.next);
  println!("  Tag:      {}", plan.tag);
  println!("  Branch:   {}", plan.branch);
  println!("  Remote:   {} ({})", plan.remote, plan.remote_url);
  println!(
    "  Tests:    {}",
    if config.tests.skip {
      "skipped".to_string()
    } else {
      config.tests.command.join(" ")
    }
  );
  println!();
  println!("🔍 Dry-run mode (no changes applied)");
}
