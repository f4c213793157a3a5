//! The `flow` greeting: a fixed line plus the release version it was built from

use crate::core::config::{DEFAULT_VERSION_KEY, DEFAULT_VERSION_PATH};
use crate::core::error::FlowResult;
use crate::version::{Version, VersionStore};
use std::path::Path;

pub const GREETING: &str = "Hello from flow!";

/// Version store content compiled into the binary
///
/// Always the default store; `ReleaseConfig::validate` rejects a moved or
/// renamed store while `flow` is the validate command.
const EMBEDDED_STORE: &str = include_str!("../version.toml");

/// Release version recorded in `version.toml` at build time
pub fn embedded_version() -> FlowResult<Version> {
  VersionStore::parse_contents(EMBEDDED_STORE, DEFAULT_VERSION_KEY, Path::new(DEFAULT_VERSION_PATH))
}

pub fn greeting_line(version: &Version) -> String {
  format!("{} (version {})", GREETING, version)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_greeting_line_format() {
    assert_eq!(
      greeting_line(&Version::new(0, 1, 1)),
      "Hello from flow! (version 0.1.1)"
    );
  }

  #[test]
  fn test_embedded_store_parses() {
    assert!(embedded_version().is_ok());
  }

  #[test]
  fn test_embedded_store_matches_package_version() {
    let version = embedded_version().unwrap();
    assert_eq!(version.to_string(), env!("CARGO_PKG_VERSION"));
  }

  #[test]
  fn test_greeting_is_detected_by_validation() {
    let version = embedded_version().unwrap();
    let line = greeting_line(&version);
    assert!(crate::release::validate::check_reported_version(&version, &line).is_ok());
  }
}
