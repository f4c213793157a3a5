//! flow-cli: the `flow` greeting command and the `flow-release` procedure
//!
//! - **core**: configuration, errors and git access
//! - **version**: the `Version` type and its on-disk store
//! - **release**: the release orchestrator and its collaborators
//! - **greeting**: what `flow` prints
//! - **commands**: CLI entry points behind the binaries

pub mod commands;
pub mod core;
pub mod greeting;
pub mod release;
pub mod utils;
pub mod version;
