//! Post-install validation: does the installed command report the released version?

use crate::core::error::{FlowResult, ReleaseError};
use crate::version::Version;

/// First `major.minor.patch` substring embedded in `output`
///
/// A candidate must not start in the middle of a number or dotted run, and
/// a four-part run like `1.2.3.4` is not a version.
pub fn extract_version(output: &str) -> Option<Version> {
  for (i, c) in output.char_indices() {
    if !c.is_ascii_digit() {
      continue;
    }
    if let Some(prev) = output[..i].chars().next_back()
      && (prev.is_ascii_digit() || prev == '.')
    {
      continue;
    }

    let mut rest = &output[i..];
    let Some(version) = Version::parse_prefix(&mut rest) else {
      continue;
    };

    let four_part = rest
      .strip_prefix('.')
      .is_some_and(|tail| tail.starts_with(|c: char| c.is_ascii_digit()));
    if !four_part {
      return Some(version);
    }
  }

  None
}

/// Fail with `VersionMismatch` unless `output` reports `expected`
pub fn check_reported_version(expected: &Version, output: &str) -> FlowResult<()> {
  match extract_version(output) {
    Some(found) if &found == expected => Ok(()),
    found => Err(
      ReleaseError::VersionMismatch {
        expected: expected.to_string(),
        found: found.map(|v| v.to_string()),
      }
      .into(),
    ),
  }
}
