//! Operator confirmation for the two risky gates (failed tests, uncommitted changes)

use crate::core::error::FlowResult;
use std::io::{self, BufRead, Write};

/// Answers yes/no questions during a release
pub trait Prompter {
  /// Ask `question`; only an affirmative answer returns `true`
  fn confirm(&self, question: &str) -> FlowResult<bool>;
}

/// Interactive prompt on stdin/stdout
///
/// Blocks until a line is read. Anything but `y`/`yes` (including EOF)
/// counts as "no".
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
  fn confirm(&self, question: &str) -> FlowResult<bool> {
    print!("   {} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(is_affirmative(&input))
  }
}

/// Pre-supplied answer for non-interactive runs (`--yes`)
pub struct FixedAnswer(pub bool);

impl Prompter for FixedAnswer {
  fn confirm(&self, question: &str) -> FlowResult<bool> {
    let answer = if self.0 { "yes" } else { "no" };
    println!("   {} [y/N] {} (pre-answered)", question, answer);
    Ok(self.0)
  }
}

fn is_affirmative(input: &str) -> bool {
  let input = input.trim().to_lowercase();
  input == "y" || input == "yes"
}
