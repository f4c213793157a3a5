//! Utility functions for remote URLs and git-style paths

use std::path::{Path, PathBuf};

/// Check if a remote is a local filesystem path (not a URL)
///
/// Returns true for:
/// - Absolute paths on Unix: /path/to/repo
/// - Absolute paths on Windows: C:\path\to\repo or C:/path/to/repo
/// - Relative paths: ./path or ../path
/// - UNC paths on Windows: \\server\share
///
/// Returns false for:
/// - SSH URLs: git@github.com:user/repo.git
/// - HTTPS URLs: <https://github.com/user/repo.git>
/// - file:// URLs (already a URL)
pub fn is_local_path(path: &str) -> bool {
  if path.starts_with("./") || path.starts_with("../") {
    return true;
  }

  // Windows drive letter (C:\ or C:/), checked before the URL tests since it contains ':'
  let bytes = path.as_bytes();
  if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/') {
    return true;
  }

  if path.starts_with("\\\\") {
    return true;
  }

  // Absolute paths may contain '@' or ':' (e.g. /home/a@b/remote.git)
  if path.starts_with('/') {
    return true;
  }

  if path.contains("://") || path.contains('@') {
    return false;
  }

  Path::new(path).is_absolute()
}

/// Source argument handed to the installer for a remote URL
///
/// Package installers expect URLs, so local-path remotes (common for mirrors
/// and in tests) become `file://` URLs resolved against the repository root.
pub fn install_source(remote_url: &str, repo_root: &Path) -> String {
  if !is_local_path(remote_url) {
    return remote_url.to_string();
  }

  let path = Path::new(remote_url);
  let absolute: PathBuf = if path.is_absolute() || remote_url.starts_with('/') {
    path.to_path_buf()
  } else {
    repo_root.join(path)
  };

  format!("file://{}", path_to_git_format(&absolute))
}

/// Convert a path to Git format (always forward slashes)
///
/// `git status` reports paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
