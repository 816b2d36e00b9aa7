//! # Render Command
//!
//! Prints the issues of every embed block in a note without touching it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use octonote_core::config::Appearance;
use octonote_core::embed::locate_blocks;
use octonote_core::output::{format_repo_name, print_header, print_info, print_warning};

use crate::clients::{create_github_runtime_and_client, load_settings};
use crate::resolver::resolve_embed;
use crate::terminal::{format_issue, matches_filter};

/// Command for printing embedded issues
#[derive(Args)]
pub struct RenderArgs {
  /// Markdown note containing github-issues blocks
  pub file: PathBuf,

  /// Layout, overriding the configured appearance
  #[arg(long, short, value_enum)]
  pub appearance: Option<Appearance>,

  /// Only show issues whose title, labels or author contain this text
  #[arg(long, short)]
  pub filter: Option<String>,
}

pub(crate) fn handle_render_command(args: RenderArgs) -> Result<()> {
  let doc = fs::read_to_string(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
  let blocks = locate_blocks(&doc);
  if blocks.is_empty() {
    print_warning(&format!("No github-issues blocks found in {}", args.file.display()));
    return Ok(());
  }

  let settings = load_settings()?;
  let appearance = args.appearance.unwrap_or(settings.appearance);
  let filter = args.filter.unwrap_or_default();
  let (rt, client) = create_github_runtime_and_client(&settings)?;
  let now = Utc::now();

  for block in &blocks {
    let spec = match block.spec() {
      Ok(spec) => spec,
      Err(e) => {
        print_warning(&e.to_string());
        continue;
      }
    };

    let issues = rt.block_on(resolve_embed(&client, &spec))?;
    print_header(&format_repo_name(&spec.to_line()));

    let shown: Vec<_> = issues.iter().filter(|issue| matches_filter(issue, &filter)).collect();
    if shown.is_empty() {
      print_info("No matching issues.");
      continue;
    }
    for issue in shown {
      println!("{}", format_issue(issue, appearance, now));
    }
  }

  Ok(())
}
