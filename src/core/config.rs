use crate::core::error::{ConfigError, FlowResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for flow-release
/// Searched in order: release.toml, .release.toml, .config/release.toml
///
/// Every field has a default, so a project without a config file releases
/// with `version.toml`, the `origin` remote and `cargo test`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub release: PublishConfig,
  #[serde(default)]
  pub version: VersionFileConfig,
  #[serde(default)]
  pub tests: TestConfig,
  #[serde(default)]
  pub install: InstallConfig,
}

/// Where and how releases are published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
  /// Remote that receives the branch and tag (default: "origin")
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Keep `[package].version` in the manifest equal to the version store
  #[serde(default = "default_true")]
  pub sync_manifest: bool,

  /// Manifest to keep in sync (default: "Cargo.toml")
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_true() -> bool {
  true
}

fn default_manifest() -> PathBuf {
  PathBuf::from("Cargo.toml")
}

impl Default for PublishConfig {
  fn default() -> Self {
    Self {
      remote: default_remote(),
      sync_manifest: true,
      manifest: default_manifest(),
    }
  }
}

/// Location of the version store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionFileConfig {
  /// Store file, relative to the repository root (default: "version.toml")
  #[serde(default = "default_version_path")]
  pub path: PathBuf,

  /// Name of the single assignment in the store (default: "version")
  #[serde(default = "default_version_key")]
  pub key: String,
}

/// Store location the `flow` binary embeds at build time
pub const DEFAULT_VERSION_PATH: &str = "version.toml";

/// Assignment name the `flow` binary reads from its embedded store
pub const DEFAULT_VERSION_KEY: &str = "version";

fn default_version_path() -> PathBuf {
  PathBuf::from(DEFAULT_VERSION_PATH)
}

fn default_version_key() -> String {
  DEFAULT_VERSION_KEY.to_string()
}

impl Default for VersionFileConfig {
  fn default() -> Self {
    Self {
      path: default_version_path(),
      key: default_version_key(),
    }
  }
}

/// Test gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
  /// Bypass the test gate entirely
  #[serde(default)]
  pub skip: bool,

  /// Test suite command, as argv (default: ["cargo", "test"])
  #[serde(default = "default_test_command")]
  pub command: Vec<String>,
}

fn default_test_command() -> Vec<String> {
  vec!["cargo".to_string(), "test".to_string()]
}

impl Default for TestConfig {
  fn default() -> Self {
    Self {
      skip: false,
      command: default_test_command(),
    }
  }
}

/// Install-and-validate step
///
/// `command` may use `{remote}` and `{tag}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
  #[serde(default = "default_install_command")]
  pub command: Vec<String>,

  /// Command whose output must report the released version (default: ["flow"])
  #[serde(default = "default_validate_command")]
  pub validate: Vec<String>,
}

fn default_install_command() -> Vec<String> {
  ["cargo", "install", "--git", "{remote}", "--tag", "{tag}", "--force", "flow-cli"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_validate_command() -> Vec<String> {
  vec!["flow".to_string()]
}

impl Default for InstallConfig {
  fn default() -> Self {
    Self {
      command: default_install_command(),
      validate: default_validate_command(),
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the first file found under `path`, or defaults
  pub fn load(path: &Path) -> FlowResult<Self> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load_file(&config_path),
      None => Ok(Self::default()),
    }
  }

  /// Load config from an explicit file, which must exist
  pub fn load_file(config_path: &Path) -> FlowResult<Self> {
    if !config_path.exists() {
      return Err(
        ConfigError::NotFound {
          path: config_path.to_path_buf(),
        }
        .into(),
      );
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Reject values the release procedure cannot run with
  pub fn validate(&self) -> FlowResult<()> {
    let invalid = |field: &str, reason: &str| -> FlowResult<()> {
      Err(
        ConfigError::Invalid {
          field: field.to_string(),
          reason: reason.to_string(),
        }
        .into(),
      )
    };

    if self.release.remote.trim().is_empty() {
      return invalid("release.remote", "must not be empty");
    }
    if self.version.key.trim().is_empty() {
      return invalid("version.key", "must not be empty");
    }
    if self.version.path.as_os_str().is_empty() {
      return invalid("version.path", "must not be empty");
    }
    if self.tests.command.is_empty() && !self.tests.skip {
      return invalid("tests.command", "must name a program unless tests.skip = true");
    }
    if self.install.command.is_empty() {
      return invalid("install.command", "must name a program");
    }
    if self.install.validate.is_empty() {
      return invalid("install.validate", "must name a program");
    }

    // `flow` only ever reports the version compiled in from the default store
    if self.install.validate == default_validate_command() {
      if self.version.path != Path::new(DEFAULT_VERSION_PATH) {
        return invalid(
          "version.path",
          "the flow binary embeds version.toml; keep the default or set install.validate",
        );
      }
      if self.version.key != DEFAULT_VERSION_KEY {
        return invalid(
          "version.key",
          "the flow binary reads `version`; keep the default or set install.validate",
        );
      }
    }

    Ok(())
  }
}
