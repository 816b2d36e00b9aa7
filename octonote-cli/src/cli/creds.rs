//! # Credentials Command
//!
//! Derive-based implementation of the credentials command for managing the
//! GitHub entry in `.netrc`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use dialoguer::{Confirm, Input, Password};
use octonote_core::creds::{
  GITHUB_MACHINE, get_github_credentials, get_netrc_path, has_insecure_permissions, home_dir, write_netrc_entry,
};
use octonote_core::output::{format_command, print_error, print_info, print_success, print_warning};
use octonote_gh::create_github_client;
use tokio::runtime::Runtime;

use crate::clients::load_settings;
use crate::consts::{GITHUB_TOKEN_SCOPES, GITHUB_TOKEN_URL};
use crate::prompts::octonote_theme;

/// Command for credential management
#[derive(Args)]
pub struct CredsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: CredsSubcommands,
}

/// Subcommands for the creds command
#[derive(Subcommand)]
pub enum CredsSubcommands {
  /// Check if credentials are properly configured
  #[command(long_about = "Checks if GitHub credentials are properly configured.\n\n\
                      This command verifies that your .netrc file contains an entry for\n\
                      github.com and that the file is only readable by you.")]
  Check,

  /// Set up credentials interactively
  #[command(long_about = "Interactive wizard to set up GitHub credentials.\n\n\
                      The token is validated against the GitHub API before it is written\n\
                      to your .netrc file.")]
  Setup,
}

pub(crate) fn handle_creds_command(creds: CredsArgs) -> Result<()> {
  match creds.subcommand {
    CredsSubcommands::Check => handle_check_command(),
    CredsSubcommands::Setup => handle_setup_command(),
  }
}

fn handle_check_command() -> Result<()> {
  let home = home_dir()?;
  let netrc_path = get_netrc_path(&home);

  if !netrc_path.exists() {
    print_error("No .netrc file found.");
    println!(
      "Create one with {} or add credentials to {} by hand.",
      format_command("octonote creds setup"),
      netrc_path.display()
    );
    return Ok(());
  }

  if has_insecure_permissions(&netrc_path)? {
    print_warning("Your .netrc file has insecure permissions.");
    println!(
      "For security, change permissions to 600: {}",
      format_command(&format!("chmod 600 {}", netrc_path.display()))
    );
  } else {
    print_success(".netrc file has secure permissions.");
  }

  match get_github_credentials(&home) {
    Ok(Some(creds)) => print_success(&format!("GitHub credentials found for {}.", creds.username)),
    Ok(None) => {
      print_warning("No GitHub credentials found.");
      println!("Add credentials for machine '{GITHUB_MACHINE}' to your .netrc file.");
      print_info("Example .netrc format:");
      println!("```");
      println!("machine {GITHUB_MACHINE}");
      println!("  login your-github-username");
      println!("  password your-personal-access-token");
      println!("```");
    }
    Err(e) => print_error(&format!("Error checking GitHub credentials: {e}")),
  }

  Ok(())
}

fn handle_setup_command() -> Result<()> {
  let theme = octonote_theme();
  let home = home_dir()?;
  let netrc_path = get_netrc_path(&home);

  print_info("Setting up GitHub credentials.");
  println!("You'll need your GitHub username and a Personal Access Token.");
  println!("To create a token, visit: {GITHUB_TOKEN_URL}");
  println!("Required scopes: {GITHUB_TOKEN_SCOPES}");
  println!();

  if netrc_path.exists() {
    let proceed = Confirm::with_theme(&theme)
      .with_prompt("A .netrc file already exists. Add or update the GitHub entry?")
      .default(true)
      .interact()?;
    if !proceed {
      print_info("Setup cancelled.");
      return Ok(());
    }
  }

  let username: String = Input::with_theme(&theme)
    .with_prompt("GitHub username")
    .interact_text()?;
  let token = Password::with_theme(&theme)
    .with_prompt("Personal Access Token")
    .interact()?;

  let settings = load_settings()?;
  let client = create_github_client(username.trim(), token.trim()).with_base_url(&settings.api_base_url());
  let rt = Runtime::new().context("Failed to create async runtime")?;

  print_info("Validating GitHub credentials...");
  match rt.block_on(client.test_connection()) {
    Ok(true) => {
      write_netrc_entry(&netrc_path, GITHUB_MACHINE, username.trim(), token.trim())?;
      print_success(&format!("GitHub credentials saved to {}", netrc_path.display()));
    }
    Ok(false) => {
      print_error("GitHub rejected these credentials. Nothing was saved.");
      println!("  • Make sure the username is correct");
      println!("  • Verify the token is valid, not expired, and has the required scopes");
    }
    Err(e) => {
      print_error(&format!("Error validating GitHub credentials: {e}"));
      print_info("This might be a network issue. Nothing was saved.");
    }
  }

  Ok(())
}
