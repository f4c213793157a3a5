//! Integration tests for the `flow` greeting

use crate::helpers::{run_flow, stdout};
use anyhow::Result;

#[test]
fn test_greeting_without_arguments() -> Result<()> {
  let output = run_flow(&[])?;

  assert!(output.status.success());
  assert_eq!(
    stdout(&output),
    format!("Hello from flow! (version {})\n", env!("CARGO_PKG_VERSION"))
  );

  Ok(())
}

#[test]
fn test_greeting_help() -> Result<()> {
  let output = run_flow(&["--help"])?;

  assert!(output.status.success());
  assert!(stdout(&output).contains("Usage"));

  Ok(())
}
