//! # Config Command
//!
//! Shows and edits the settings file.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use octonote_core::config::{Settings, get_config_dirs};
use octonote_core::output::{print_header, print_success};

/// Command for settings management
#[derive(Args)]
pub struct ConfigArgs {
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Print the effective settings and where they are stored
  Show,

  /// Change one setting
  #[command(long_about = "Change one setting and save it to config.toml.\n\n\
            Keys: appearance (default | compact), api_base_url, refresh_cooldown_secs.")]
  Set {
    /// Setting name
    #[arg(value_parser = Settings::KEYS)]
    key: String,
    /// New value
    value: String,
  },
}

pub(crate) fn handle_config_command(config: ConfigArgs) -> Result<()> {
  let dirs = get_config_dirs()?;

  match config.subcommand {
    ConfigSubcommands::Show => {
      let settings = dirs.load_settings()?;
      let rendered = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;

      print_header("Settings");
      print!("{rendered}");
      if settings.api_base_url() != settings.api_base_url {
        println!("# api_base_url overridden by environment: {}", settings.api_base_url());
      }

      print_header("Paths");
      println!("config: {}", dirs.settings_path().display());
      println!("refresh state: {}", dirs.refresh_state_path().display());
      Ok(())
    }
    ConfigSubcommands::Set { key, value } => {
      let mut settings = dirs.load_settings()?;
      settings.set(&key, &value)?;
      dirs.save_settings(&settings)?;
      print_success(&format!("Set {key} = {value}"));
      Ok(())
    }
  }
}
