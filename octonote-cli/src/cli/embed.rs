//! # Embed Command
//!
//! Inserts a github-issues block into a note.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use octonote_core::embed::{embed_snippet, insert_embed};
use octonote_core::issue_spec::{IssueNumbers, parse_issue_spec};
use octonote_core::output::{format_command, print_success, print_warning};
use octonote_core::repo::{RepoRef, RepoTarget};

use crate::clients::{create_github_runtime_and_client, load_settings};
use crate::prompts::pick_repo;

/// Command for embedding issues into a note
#[derive(Args)]
pub struct EmbedArgs {
  /// Markdown note to add the block to (created if missing)
  pub file: PathBuf,

  /// Repository as owner/name or URL. Chosen interactively when omitted
  pub repo: Option<RepoTarget>,

  /// Issues to embed, e.g. "#1,3-5". All open issues when omitted
  #[arg(long, short)]
  pub issues: Option<String>,

  /// Insert before this line (1-based) instead of appending
  #[arg(long, short)]
  pub line: Option<usize>,
}

pub(crate) fn handle_embed_command(args: EmbedArgs) -> Result<()> {
  let repo = match args.repo {
    Some(target) => target.repo_ref()?,
    None => choose_user_repo()?,
  };

  let issues = match args.issues.as_deref() {
    Some(spec) => {
      let issues = parse_issue_spec(spec);
      if issues.is_empty() {
        print_warning(&format!("'{spec}' selects no issues, embedding all open issues instead"));
      }
      issues
    }
    None => IssueNumbers::default(),
  };

  let doc = read_or_empty(&args.file)?;
  let updated = insert_embed(&doc, args.line, &embed_snippet(&repo, &issues))?;
  fs::write(&args.file, updated).with_context(|| format!("Failed to write {}", args.file.display()))?;

  print_success(&format!("Embedded {repo} in {}", args.file.display()));
  println!(
    "Run {} to fetch the issues.",
    format_command(&format!("octonote update {}", args.file.display()))
  );

  Ok(())
}

/// Pick one of the authenticated user's repositories
pub(crate) fn choose_user_repo() -> Result<RepoRef> {
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let repos: Vec<RepoRef> = rt
    .block_on(client.list_user_repos())?
    .iter()
    .map(|repo| repo.repo_ref())
    .collect();

  pick_repo(&repos, "Repository")
}

fn read_or_empty(path: &Path) -> Result<String> {
  if !path.exists() {
    return Ok(String::new());
  }
  fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
