//! # Repos Command
//!
//! Lists the repositories of the authenticated user as a table.

use anyhow::Result;
use clap::Args;
use octonote_core::output::print_info;
use octonote_core::time::human_date;
use octonote_gh::GitHubRepository;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::clients::{create_github_runtime_and_client, load_settings};

/// Command for listing repositories
#[derive(Args)]
pub struct ReposArgs {
  /// Only show repositories whose name contains this text
  #[arg(long, short)]
  pub filter: Option<String>,
}

#[derive(Tabled)]
struct RepoRow {
  #[tabled(rename = "Repository")]
  name: String,
  #[tabled(rename = "Language")]
  language: String,
  #[tabled(rename = "Open Issues")]
  open_issues: u32,
  #[tabled(rename = "Updated")]
  updated: String,
}

impl From<&GitHubRepository> for RepoRow {
  fn from(repo: &GitHubRepository) -> Self {
    Self {
      name: if repo.private {
        format!("{} (private)", repo.full_name)
      } else {
        repo.full_name.clone()
      },
      language: repo.language.clone().unwrap_or_else(|| "-".to_string()),
      open_issues: repo.open_issues_count,
      updated: repo.updated_at.map(human_date).unwrap_or_else(|| "-".to_string()),
    }
  }
}

fn name_matches(repo: &GitHubRepository, filter: Option<&str>) -> bool {
  filter.is_none_or(|f| repo.full_name.to_lowercase().contains(&f.to_lowercase()))
}

pub(crate) fn handle_repos_command(args: ReposArgs) -> Result<()> {
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let repos = rt.block_on(client.list_user_repos())?;
  let rows: Vec<RepoRow> = repos
    .iter()
    .filter(|repo| name_matches(repo, args.filter.as_deref()))
    .map(RepoRow::from)
    .collect();

  if rows.is_empty() {
    print_info("No repositories found.");
    return Ok(());
  }

  let mut table = Table::new(rows);
  table.with(Style::rounded());
  println!("{table}");

  Ok(())
}
