//! Integration tests for the flow and flow-release binaries

mod helpers;
mod test_greeting;
mod test_release;
