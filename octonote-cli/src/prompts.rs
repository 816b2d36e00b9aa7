//! # Prompts Module
//!
//! Provides a custom dialoguer theme for consistent styling across octonote's
//! interactive prompts.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use console::Style;
use dialoguer::FuzzySelect;
use dialoguer::theme::ColorfulTheme;
use octonote_core::repo::RepoRef;

/// Returns a custom dialoguer theme matching octonote's color palette.
pub fn octonote_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
    active_item_style: Style::new().green(),
    checked_item_prefix: Style::new().green().apply_to("◉ ".to_string()),
    unchecked_item_prefix: Style::new().dim().apply_to("○ ".to_string()),
    ..ColorfulTheme::default()
  }
}

/// Whether prompts can be shown
pub fn is_interactive() -> bool {
  std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Let the user pick one repository with a fuzzy search
pub fn pick_repo(repos: &[RepoRef], prompt: &str) -> Result<RepoRef> {
  if repos.is_empty() {
    anyhow::bail!("No repositories to choose from");
  }
  if !is_interactive() {
    anyhow::bail!("No repository given and no terminal to choose one interactively");
  }

  let items: Vec<String> = repos.iter().map(ToString::to_string).collect();
  let selection = FuzzySelect::with_theme(&octonote_theme())
    .with_prompt(prompt)
    .items(&items)
    .default(0)
    .interact()?;

  repos.get(selection).cloned().context("Selected repository is out of range")
}
