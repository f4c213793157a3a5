//! Release orchestration
//!
//! - **orchestrator**: the end-to-end procedure (preflight through validation)
//! - **stage**: progress marker reported on failure
//! - **runner**: test suite and installer collaborators
//! - **prompt**: operator confirmation for the risky gates
//! - **validate**: version extraction from the installed command's output

pub mod orchestrator;
pub mod prompt;
pub mod runner;
pub mod stage;
pub mod validate;

pub use orchestrator::{Collaborators, ReleaseOrchestrator, ReleasePlan, ReleaseSummary};
pub use prompt::{FixedAnswer, Prompter, StdinPrompter};
pub use runner::{CommandInstaller, CommandTestRunner, Installer, TestOutcome, TestRunner};
pub use stage::ReleaseStage;
