//! Building blocks shared by both binaries
//!
//! - **config**: release.toml discovery, parsing and validation
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
