//! # Labels Command

use anyhow::Result;
use clap::Args;
use octonote_core::output::{format_label, format_repo_name, print_header, print_info};
use octonote_core::repo::RepoTarget;
use owo_colors::OwoColorize;

use crate::clients::{create_github_runtime_and_client, load_settings};

/// Command for listing repository labels
#[derive(Args)]
pub struct LabelsArgs {
  /// Repository as owner/name or URL
  pub repo: RepoTarget,
}

pub(crate) fn handle_labels_command(args: LabelsArgs) -> Result<()> {
  let repo = args.repo.repo_ref()?;
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let labels = rt.block_on(client.list_labels(&repo.owner, &repo.name))?;
  if labels.is_empty() {
    print_info(&format!("{repo} has no labels."));
    return Ok(());
  }

  print_header(&format!("Labels in {}", format_repo_name(&repo.to_string())));
  for label in labels {
    match label.description.as_deref().filter(|d| !d.is_empty()) {
      Some(description) => println!("{}  {}", format_label(&label.name, &label.color), description.dimmed()),
      None => println!("{}", format_label(&label.name, &label.color)),
    }
  }

  Ok(())
}
