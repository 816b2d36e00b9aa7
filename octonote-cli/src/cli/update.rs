//! # Update Command
//!
//! Refreshes the materialized issue lists of a note.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use octonote_core::config::Settings;
use octonote_core::output::{print_info, print_success, print_warning};
use octonote_gh::GitHubClient;
use tokio::runtime::Runtime;

use crate::clients::{create_github_runtime_and_client, load_settings};
use crate::consts::NO_UPDATES_MESSAGE;
use crate::updater::{BlockStatus, UpdateMode, UpdateReport, update_file};

/// Command for refreshing a note
#[derive(Args)]
pub struct UpdateArgs {
  /// Markdown note containing github-issues blocks
  pub file: PathBuf,

  /// Rewrite every list, ignoring the cooldown and change detection
  #[arg(long, short)]
  pub force: bool,
}

pub(crate) fn handle_update_command(args: UpdateArgs) -> Result<()> {
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let mode = if args.force { UpdateMode::Force } else { UpdateMode::Soft };
  refresh_note(&rt, &client, &args.file, mode, &settings)
}

/// Update a note and report what happened to each block
pub(crate) fn refresh_note(
  rt: &Runtime,
  client: &GitHubClient,
  file: &Path,
  mode: UpdateMode,
  settings: &Settings,
) -> Result<()> {
  let report = update_file(rt, client, file, mode, settings)?;
  print_report(file, &report);
  Ok(())
}

fn print_report(file: &Path, report: &UpdateReport) {
  if report.outcomes.is_empty() {
    print_warning(&format!("No github-issues blocks found in {}", file.display()));
    return;
  }

  for outcome in &report.outcomes {
    let name = outcome
      .repo
      .as_ref()
      .map_or_else(|| format!("block {}", outcome.index + 1), ToString::to_string);

    match &outcome.status {
      BlockStatus::Rewritten { issues } => print_success(&format!("Updated {name}: {issues} issue(s)")),
      BlockStatus::Unchanged => {}
      BlockStatus::Throttled { remaining } => print_info(&format!(
        "Skipped {name}: refreshed recently, try again in {}s or use --force",
        remaining.num_seconds().max(1)
      )),
      BlockStatus::Invalid(message) => print_warning(message),
    }
  }

  if report.fetched() && !report.changed() {
    print_info(NO_UPDATES_MESSAGE);
  }
}
