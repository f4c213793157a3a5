use serde::Serialize;
use std::fmt;

/// Progress of a release, in the order the steps run
///
/// A failed release keeps the last stage it reached, which tells the
/// operator which side effects already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseStage {
  Start,
  PreflightChecked,
  TestsRun,
  VersionBumped,
  Committed,
  Tagged,
  Pushed,
  Installed,
  Validated,
  Done,
}

impl ReleaseStage {
  /// Whether anything has left the local machine
  pub fn is_published(self) -> bool {
    self >= ReleaseStage::Pushed
  }

  /// Whether the repository or working tree has been modified
  pub fn has_local_changes(self) -> bool {
    self >= ReleaseStage::Committed
  }

  pub fn describe(self) -> &'static str {
    match self {
      ReleaseStage::Start => "nothing done yet",
      ReleaseStage::PreflightChecked => "preflight passed",
      ReleaseStage::TestsRun => "tests run",
      ReleaseStage::VersionBumped => "next version computed",
      ReleaseStage::Committed => "version committed locally",
      ReleaseStage::Tagged => "tag created locally",
      ReleaseStage::Pushed => "branch and tag pushed",
      ReleaseStage::Installed => "published package installed",
      ReleaseStage::Validated => "installed version validated",
      ReleaseStage::Done => "release complete",
    }
  }
}

impl fmt::Display for ReleaseStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.describe())
  }
}
