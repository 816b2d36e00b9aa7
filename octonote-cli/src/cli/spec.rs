//! # Spec Command
//!
//! Prints the issue numbers an issue specification selects.

use anyhow::Result;
use clap::Args;
use octonote_core::issue_spec::parse_issue_spec;
use octonote_core::output::print_warning;

/// Command for parsing an issue specification
#[derive(Args)]
pub struct SpecArgs {
  /// Text containing the specification, e.g. "owner/repo #1,3-5"
  #[arg(required = true, num_args = 1..)]
  pub text: Vec<String>,
}

pub(crate) fn handle_spec_command(args: SpecArgs) -> Result<()> {
  let text = args.text.join(" ");
  let numbers = parse_issue_spec(&text);

  if numbers.is_empty() {
    print_warning("No issue numbers found. Write them as #N, #N,M or #N-M.");
  }
  println!("{numbers}");

  Ok(())
}
