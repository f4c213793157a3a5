//! Release versions and the file that stores the current one
//!
//! A release version is always a plain `major.minor.patch` triple. Pre-release
//! and build metadata are rejected at parse time, so every `Version` maps to
//! exactly one tag label and back.

pub mod store;

pub use store::{VersionStore, sync_manifest_version};

use crate::core::error::{FlowResult, VersionError};
use std::fmt;
use std::str::FromStr;
use winnow::ascii::digit1;
use winnow::prelude::*;

/// Prefix of every release tag
pub const TAG_PREFIX: &str = "v";

/// A release version: (major, minor, patch)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
  /// Build a version from its three components
  pub fn new(major: u64, minor: u64, patch: u64) -> Self {
    Self(semver::Version::new(major, minor, patch))
  }

  pub fn major(&self) -> u64 {
    self.0.major
  }

  pub fn minor(&self) -> u64 {
    self.0.minor
  }

  pub fn patch(&self) -> u64 {
    self.0.patch
  }

  /// Successor used by every release: (M, m, p) -> (M, m, p + 1)
  ///
  /// Fails instead of wrapping when the patch is already `u64::MAX`.
  pub fn increment_patch(&self) -> FlowResult<Self> {
    let patch = self
      .patch()
      .checked_add(1)
      .ok_or_else(|| VersionError::PatchOverflow {
        version: self.to_string(),
      })?;
    Ok(Self::new(self.major(), self.minor(), patch))
  }

  /// Tag label for this version, e.g. `v0.1.1`
  pub fn tag_label(&self) -> String {
    format!("{}{}", TAG_PREFIX, self)
  }

  /// Parse a version from the start of `input`, advancing past it
  ///
  /// Used both for strict parsing (where the whole input must be consumed)
  /// and for scanning command output for an embedded version.
  pub(crate) fn parse_prefix(input: &mut &str) -> Option<Self> {
    let mut parser = (digit1::<_, ()>, '.', digit1, '.', digit1);
    let (major, _, minor, _, patch) = parser.parse_next(input).ok()?;

    // digit1 guarantees ASCII digits, so only overflow can fail here
    Some(Self::new(major.parse().ok()?, minor.parse().ok()?, patch.parse().ok()?))
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
  }
}

impl FromStr for Version {
  type Err = crate::core::error::FlowError;

  fn from_str(s: &str) -> FlowResult<Self> {
    let mut input = s;
    match Self::parse_prefix(&mut input) {
      Some(version) if input.is_empty() => Ok(version),
      _ => Err(VersionError::Parse { input: s.to_string() }.into()),
    }
  }
}

impl From<Version> for semver::Version {
  fn from(v: Version) -> Self {
    v.0
  }
}

impl serde::Serialize for Version {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
