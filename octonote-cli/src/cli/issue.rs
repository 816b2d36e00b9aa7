//! # Issue Commands
//!
//! Create, inspect, comment on and close issues without leaving the terminal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use dialoguer::{Input, MultiSelect};
use octonote_core::embed::locate_blocks;
use octonote_core::output::{format_issue_number, format_repo_name, print_info, print_success};
use octonote_core::repo::{RepoRef, RepoTarget};
use octonote_gh::{GitHubClient, NewIssue};
use tokio::runtime::Runtime;
use tracing::debug;

use super::embed::choose_user_repo;
use super::update::refresh_note;
use crate::clients::{create_github_runtime_and_client, load_settings};
use crate::prompts::{is_interactive, octonote_theme, pick_repo};
use crate::terminal::format_issue_details;
use crate::updater::UpdateMode;

/// Command for working with single issues
#[derive(Args)]
pub struct IssueArgs {
  #[command(subcommand)]
  pub subcommand: IssueSubcommands,
}

#[derive(Subcommand)]
pub enum IssueSubcommands {
  /// Open a new issue
  #[command(long_about = "Open a new issue.\n\n\
            The repository comes from --repo, then from the blocks of --file, then\n\
            from an interactive pick among your repositories. When --file is given\n\
            the note is refreshed afterwards so the new issue shows up.")]
  New {
    /// Note whose blocks suggest the repository and which is refreshed afterwards
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Repository as owner/name or URL
    #[arg(long, short)]
    repo: Option<RepoTarget>,

    /// Issue title. Prompted for when omitted
    #[arg(long, short)]
    title: Option<String>,

    /// Issue body
    #[arg(long, short)]
    body: Option<String>,

    /// Label to apply (repeatable)
    #[arg(long = "label", short)]
    labels: Vec<String>,
  },

  /// Show an issue with its comments
  Show {
    /// Repository as owner/name or URL
    repo: RepoTarget,
    /// Issue number, with or without '#'
    #[arg(value_parser = parse_issue_number)]
    number: u32,
  },

  /// Comment on an issue
  Comment {
    /// Repository as owner/name or URL
    repo: RepoTarget,
    /// Issue number, with or without '#'
    #[arg(value_parser = parse_issue_number)]
    number: u32,
    /// Comment text. Prompted for when omitted
    #[arg(long, short)]
    body: Option<String>,
  },

  /// Close an issue
  Close {
    /// Repository as owner/name or URL
    repo: RepoTarget,
    /// Issue number, with or without '#'
    #[arg(value_parser = parse_issue_number)]
    number: u32,
    /// Note to refresh after closing
    #[arg(long, short)]
    file: Option<PathBuf>,
  },

  /// Open an issue in the browser
  Browse {
    /// Repository as owner/name or URL
    repo: RepoTarget,
    /// Issue number, with or without '#'
    #[arg(value_parser = parse_issue_number)]
    number: u32,
  },
}

pub(crate) fn handle_issue_command(args: IssueArgs) -> Result<()> {
  match args.subcommand {
    IssueSubcommands::New {
      file,
      repo,
      title,
      body,
      labels,
    } => handle_new(file.as_deref(), repo, title, body, labels),
    IssueSubcommands::Show { repo, number } => handle_show(&repo.repo_ref()?, number),
    IssueSubcommands::Comment { repo, number, body } => handle_comment(&repo.repo_ref()?, number, body),
    IssueSubcommands::Close { repo, number, file } => handle_close(&repo.repo_ref()?, number, file.as_deref()),
    IssueSubcommands::Browse { repo, number } => {
      let url = repo.repo_ref()?.issue_url(number);
      open::that(&url).with_context(|| format!("Failed to open {url}"))?;
      print_info(&format!("Opened {url}"));
      Ok(())
    }
  }
}

fn parse_issue_number(input: &str) -> Result<u32, String> {
  let digits = input.trim().trim_start_matches('#');
  match digits.parse::<u32>() {
    Ok(0) | Err(_) => Err(format!("'{input}' is not an issue number")),
    Ok(n) => Ok(n),
  }
}

fn handle_new(
  file: Option<&Path>,
  repo: Option<RepoTarget>,
  title: Option<String>,
  body: Option<String>,
  labels: Vec<String>,
) -> Result<()> {
  let repo = match repo {
    Some(target) => target.repo_ref()?,
    None => match file.map(repos_in_note).transpose()?.unwrap_or_default().as_slice() {
      [] => choose_user_repo()?,
      [only] => only.clone(),
      several => pick_repo(several, "Repository")?,
    },
  };

  let title = match title {
    Some(title) => title,
    None if is_interactive() => Input::with_theme(&octonote_theme())
      .with_prompt("Title")
      .interact_text()?,
    None => anyhow::bail!("--title is required when not running interactively"),
  };
  if title.trim().is_empty() {
    anyhow::bail!("Issue title cannot be empty");
  }

  let body = match body {
    Some(body) => body,
    None if is_interactive() => Input::with_theme(&octonote_theme())
      .with_prompt("Body")
      .allow_empty(true)
      .interact_text()?,
    None => String::new(),
  };

  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let labels = if labels.is_empty() && is_interactive() {
    choose_labels(&rt, &client, &repo)?
  } else {
    labels
  };

  let new_issue = NewIssue {
    title: title.trim().to_string(),
    body: Some(body).filter(|b| !b.trim().is_empty()),
    labels,
    assignees: vec![repo.owner.clone()],
  };

  let issue = rt.block_on(client.create_issue(&repo.owner, &repo.name, &new_issue))?;
  print_success(&format!(
    "Created {} in {}: {}",
    format_issue_number(issue.number),
    format_repo_name(&repo.to_string()),
    issue.html_url
  ));

  if let Some(file) = file {
    refresh_note(&rt, &client, file, UpdateMode::Force, &settings)?;
  }

  Ok(())
}

/// Distinct repositories referenced by the note's blocks, in document order
fn repos_in_note(path: &Path) -> Result<Vec<RepoRef>> {
  let doc = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

  let mut repos: Vec<RepoRef> = Vec::new();
  for block in locate_blocks(&doc) {
    match block.spec() {
      Ok(spec) if !repos.contains(&spec.repo) => repos.push(spec.repo),
      Ok(_) => {}
      Err(e) => debug!("Ignoring block {}: {}", block.index, e),
    }
  }
  Ok(repos)
}

fn choose_labels(rt: &Runtime, client: &GitHubClient, repo: &RepoRef) -> Result<Vec<String>> {
  let available = rt.block_on(client.list_labels(&repo.owner, &repo.name))?;
  if available.is_empty() {
    return Ok(Vec::new());
  }

  let names: Vec<&str> = available.iter().map(|label| label.name.as_str()).collect();
  let chosen = MultiSelect::with_theme(&octonote_theme())
    .with_prompt("Labels (space to toggle, enter to confirm)")
    .items(&names)
    .interact()?;

  Ok(chosen.into_iter().filter_map(|i| names.get(i)).map(ToString::to_string).collect())
}

fn handle_show(repo: &RepoRef, number: u32) -> Result<()> {
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let (issue, comments) = rt.block_on(async {
    tokio::try_join!(
      client.get_issue(&repo.owner, &repo.name, number),
      client.list_comments(&repo.owner, &repo.name, number),
    )
  })?;

  println!("{}", format_issue_details(&issue, &comments, Utc::now()));
  Ok(())
}

fn handle_comment(repo: &RepoRef, number: u32, body: Option<String>) -> Result<()> {
  let body = match body {
    Some(body) => body,
    None if is_interactive() => Input::with_theme(&octonote_theme())
      .with_prompt("Comment")
      .interact_text()?,
    None => anyhow::bail!("--body is required when not running interactively"),
  };
  if body.trim().is_empty() {
    anyhow::bail!("Comment cannot be empty");
  }

  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let comment = rt.block_on(client.create_comment(&repo.owner, &repo.name, number, body.trim()))?;
  print_success(&format!("Commented on {}: {}", format_issue_number(number), comment.html_url));
  Ok(())
}

fn handle_close(repo: &RepoRef, number: u32, file: Option<&Path>) -> Result<()> {
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  let issue = rt.block_on(client.close_issue(&repo.owner, &repo.name, number))?;
  print_success(&format!(
    "Closed {} in {}: {}",
    format_issue_number(issue.number),
    format_repo_name(&repo.to_string()),
    issue.title
  ));

  if let Some(file) = file {
    refresh_note(&rt, &client, file, UpdateMode::Force, &settings)?;
  }

  Ok(())
}
