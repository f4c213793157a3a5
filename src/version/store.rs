//! The version store: one file, one assignment, read and written wholesale
//!
//! ```toml
//! version = "0.1.0"
//! ```

use super::Version;
use crate::core::error::{FlowError, FlowResult, ResultExt, VersionError};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// Durable storage of the current release version
#[derive(Debug, Clone)]
pub struct VersionStore {
  path: PathBuf,
  key: String,
}

impl VersionStore {
  pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      key: key.into(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read and parse the current version
  pub fn read(&self) -> FlowResult<Version> {
    let content = fs::read_to_string(&self.path)
      .with_context(|| format!("Failed to read version store {}", self.path.display()))?;
    Self::parse_contents(&content, &self.key, &self.path)
  }

  /// Replace the store's entire content with `version`
  pub fn write(&self, version: &Version) -> FlowResult<()> {
    let mut doc = DocumentMut::new();
    doc[self.key.as_str()] = toml_edit::value(version.to_string());

    fs::write(&self.path, doc.to_string())
      .with_context(|| format!("Failed to write version store {}", self.path.display()))?;
    debug!("wrote {} = {} to {}", self.key, version, self.path.display());
    Ok(())
  }

  /// Parse store content: exactly one assignment, `key = "major.minor.patch"`
  ///
  /// `path` is only used to label errors.
  pub fn parse_contents(content: &str, key: &str, path: &Path) -> FlowResult<Version> {
    let store_error = |reason: String| -> FlowError {
      VersionError::Store {
        path: path.to_path_buf(),
        reason,
      }
      .into()
    };

    let doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| store_error(e.to_string()))?;
    let table = doc.as_table();

    if table.len() != 1 {
      return Err(store_error(format!(
        "expected exactly one assignment, found {}",
        table.len()
      )));
    }

    let item = table
      .get(key)
      .ok_or_else(|| store_error(format!("no `{}` assignment", key)))?;
    let value = item
      .as_str()
      .ok_or_else(|| store_error(format!("`{}` is not a quoted string", key)))?;

    value.parse()
  }
}

/// Set `[package].version` in a Cargo manifest, preserving formatting
///
/// A `Cargo.lock` beside the manifest gets the same version on the package's
/// own entry, so the next `cargo` run leaves the lockfile untouched.
/// Returns `false` when the manifest does not exist.
pub fn sync_manifest_version(manifest_path: &Path, version: &Version) -> FlowResult<bool> {
  if !manifest_path.exists() {
    debug!("no manifest at {}, skipping version sync", manifest_path.display());
    return Ok(false);
  }

  let content = fs::read_to_string(manifest_path)
    .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

  let mut doc: DocumentMut = content
    .parse()
    .map_err(|e| FlowError::message(format!("Failed to parse {}: {}", manifest_path.display(), e)))?;

  let Some(package) = doc.get_mut("package").and_then(|p| p.as_table_mut()) else {
    return Err(FlowError::message(format!(
      "No [package] section in {}",
      manifest_path.display()
    )));
  };
  package["version"] = toml_edit::value(version.to_string());
  let name = package.get("name").and_then(|n| n.as_str()).map(str::to_string);

  fs::write(manifest_path, doc.to_string()).with_context(|| format!("Failed to write {}", manifest_path.display()))?;

  if let Some(name) = name {
    sync_lockfile_version(&manifest_path.with_file_name("Cargo.lock"), &name, version)?;
  }

  Ok(true)
}

/// Set the version of the local `package` entry in a lockfile
///
/// Registry and git entries carry a `source` key; the local package does not.
/// Returns `false` when there is no lockfile or no matching entry.
fn sync_lockfile_version(lockfile: &Path, package: &str, version: &Version) -> FlowResult<bool> {
  if !lockfile.exists() {
    return Ok(false);
  }

  let content =
    fs::read_to_string(lockfile).with_context(|| format!("Failed to read {}", lockfile.display()))?;
  let mut doc: DocumentMut = content
    .parse()
    .map_err(|e| FlowError::message(format!("Failed to parse {}: {}", lockfile.display(), e)))?;

  let mut updated = false;
  if let Some(entries) = doc.get_mut("package").and_then(|p| p.as_array_of_tables_mut()) {
    for entry in entries.iter_mut() {
      let is_local = entry.get("name").and_then(|n| n.as_str()) == Some(package) && !entry.contains_key("source");
      if is_local {
        entry["version"] = toml_edit::value(version.to_string());
        updated = true;
      }
    }
  }

  if !updated {
    debug!("no local '{}' entry in {}", package, lockfile.display());
    return Ok(false);
  }

  fs::write(lockfile, doc.to_string()).with_context(|| format!("Failed to write {}", lockfile.display()))?;
  debug!("set {} to {} in {}", package, version, lockfile.display());
  Ok(true)
}
