//! # Auth Command
//!
//! Verifies GitHub credentials against the configured API.

use anyhow::Result;
use clap::{Args, Subcommand};
use octonote_core::output::{format_command, format_login, print_error, print_success};

use crate::clients::{create_github_runtime_and_client, load_settings};

/// Command for authentication checks
#[derive(Args)]
pub struct AuthArgs {
  #[command(subcommand)]
  pub subcommand: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
  /// Fetch the authenticated user to confirm the credentials work
  Check,
}

pub(crate) fn handle_auth_command(auth: AuthArgs) -> Result<()> {
  match auth.subcommand {
    AuthSubcommands::Check => handle_check_command(),
  }
}

fn handle_check_command() -> Result<()> {
  let settings = load_settings()?;
  let (rt, client) = create_github_runtime_and_client(&settings)?;

  match rt.block_on(client.get_current_user()) {
    Ok(user) => {
      let name = user.name.as_deref().map(|n| format!(" ({n})")).unwrap_or_default();
      print_success(&format!("Authenticated as {}{name}", format_login(&user.login)));
      println!("Profile: {}", user.profile_url());
      println!("API: {}", client.base_url());
      Ok(())
    }
    Err(e) => {
      print_error(&format!("GitHub rejected the stored credentials: {e}"));
      println!("Run {} to update them.", format_command("octonote creds setup"));
      Err(e)
    }
  }
}
