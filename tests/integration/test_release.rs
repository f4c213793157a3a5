//! Integration tests for `flow-release`

use crate::helpers::{TestRepo, git, run_flow_release, stderr, stdout};
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_release_bumps_commits_tags_and_pushes() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_flow_release(&repo.path, &[], None)?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  assert_eq!(repo.read_file("version.toml")?, "version = \"0.1.1\"\n");
  assert_eq!(repo.head_subject()?, "Bump version to 0.1.1");
  assert_eq!(repo.local_tags()?, vec!["v0.1.1"]);
  assert_eq!(repo.remote_tags()?, vec!["v0.1.1"]);

  // Branch reached the remote too
  let local = git(&repo.path, &["rev-parse", "HEAD"])?;
  let remote = git(&repo.remote, &["rev-parse", "main"])?;
  assert_eq!(local.stdout, remote.stdout);

  assert!(stdout(&output).contains("Released v0.1.1"));

  Ok(())
}

#[test]
fn test_second_release_continues_from_store() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"[tests]
skip = true

[install]
command = ["true"]
validate = ["sh", "-c", "sed 's/version = /flow /' version.toml"]
"#,
  )?;

  let first = run_flow_release(&repo.path, &[], None)?;
  assert!(first.status.success(), "stderr: {}", stderr(&first));
  let second = run_flow_release(&repo.path, &[], None)?;
  assert!(second.status.success(), "stderr: {}", stderr(&second));

  assert_eq!(repo.read_file("version.toml")?, "version = \"0.1.2\"\n");
  assert_eq!(repo.remote_tags()?, vec!["v0.1.1", "v0.1.2"]);

  Ok(())
}

#[test]
fn test_duplicate_tag_fails_before_push() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["tag", "v0.1.1"])?;

  let output = run_flow_release(&repo.path, &[], None)?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Duplicate tag"));
  assert_eq!(repo.read_file("version.toml")?, "version = \"0.1.0\"\n");
  assert_eq!(repo.head_subject()?, "Initial commit");
  assert!(repo.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_declined_uncommitted_changes_abort() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("notes.txt", "work in progress\n")?;

  let output = run_flow_release(&repo.path, &[], Some("n\n"))?;

  assert_eq!(output.status.code(), Some(4));
  assert!(stdout(&output).contains("notes.txt"));
  assert!(stderr(&output).contains("Release aborted"));
  assert_eq!(repo.read_file("version.toml")?, "version = \"0.1.0\"\n");
  assert!(repo.local_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_confirmed_changes_join_release_commit() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("notes.txt", "release notes\n")?;

  let output = run_flow_release(&repo.path, &[], Some("y\n"))?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let files = repo.head_files()?;
  assert!(files.contains(&"notes.txt".to_string()));
  assert!(files.contains(&"version.toml".to_string()));

  Ok(())
}

#[test]
fn test_yes_flag_answers_prompts() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("notes.txt", "release notes\n")?;

  let output = run_flow_release(&repo.path, &["--yes"], None)?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("pre-answered"));

  Ok(())
}

#[test]
fn test_failing_tests_abort_without_override() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"[tests]
command = ["false"]
"#,
  )?;

  let output = run_flow_release(&repo.path, &[], Some("n\n"))?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Test failure"));
  assert_eq!(repo.read_file("version.toml")?, "version = \"0.1.0\"\n");

  Ok(())
}

#[test]
fn test_skip_tests_flag_bypasses_failing_suite() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"[tests]
command = ["false"]

[install]
command = ["true"]
validate = ["echo", "flow 0.1.1"]
"#,
  )?;

  let output = run_flow_release(&repo.path, &["--skip-tests"], None)?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("Skipping tests"));

  Ok(())
}

#[test]
fn test_version_mismatch_after_publish() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"[tests]
skip = true

[install]
command = ["true"]
validate = ["echo", "Hello from flow! (version 0.1.0)"]
"#,
  )?;

  let output = run_flow_release(&repo.path, &[], None)?;

  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("Version mismatch"));
  assert!(err.contains("not rolled back"));
  // Published but unvalidated
  assert_eq!(repo.remote_tags()?, vec!["v0.1.1"]);

  Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_flow_release(&repo.path, &["--dry-run"], None)?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.contains("0.1.0"));
  assert!(out.contains("v0.1.1"));
  assert!(out.contains("Dry-run"));

  assert_eq!(repo.read_file("version.toml")?, "version = \"0.1.0\"\n");
  assert_eq!(repo.head_subject()?, "Initial commit");
  assert!(repo.local_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_dry_run_json() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_flow_release(&repo.path, &["--dry-run", "--json"], None)?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let plan: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(plan["current"], "0.1.0");
  assert_eq!(plan["next"], "0.1.1");
  assert_eq!(plan["tag"], "v0.1.1");
  assert_eq!(plan["branch"], "main");
  assert_eq!(plan["remote"], "origin");

  Ok(())
}

#[test]
fn test_missing_remote_is_environment_error() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_flow_release(&repo.path, &["--remote", "upstream"], None)?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no remote named 'upstream'"));

  Ok(())
}

#[test]
fn test_outside_repository_is_environment_error() -> Result<()> {
  let dir = TempDir::new()?;
  std::fs::write(dir.path().join("version.toml"), "version = \"0.1.0\"\n")?;

  let output = run_flow_release(dir.path(), &[], None)?;

  assert!(!output.status.success());
  assert!(stderr(&output).contains("not a git repository"));

  Ok(())
}

#[test]
fn test_malformed_store_is_reported() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("version.toml", "version = \"1.2\"\n")?;
  git(&repo.path, &["commit", "-am", "Break version"])?;

  let output = run_flow_release(&repo.path, &[], None)?;

  assert_eq!(output.status.code(), Some(1));
  assert!(repo.local_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_help_exits_zero() -> Result<()> {
  let dir = TempDir::new()?;
  let output = run_flow_release(dir.path(), &["--help"], None)?;

  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("--skip-tests"));
  assert!(out.contains("--dry-run"));

  Ok(())
}

#[test]
fn test_unknown_flag_exits_one() -> Result<()> {
  let dir = TempDir::new()?;
  let output = run_flow_release(dir.path(), &["--frobnicate"], None)?;

  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
