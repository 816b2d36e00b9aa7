//! # Client Creation
//!
//! Centralized GitHub client creation for CLI commands. Credentials come from
//! `.netrc` and the API root from the user's settings.

use anyhow::{Context, Result};
use octonote_core::config::{Settings, get_config_dirs};
use octonote_core::creds::home_dir;
use octonote_gh::GitHubClient;
use tokio::runtime::Runtime;

/// Load settings, falling back to defaults when the file is missing
pub fn load_settings() -> Result<Settings> {
  get_config_dirs()?.load_settings()
}

/// Creates a tokio runtime and an authenticated GitHub client
pub fn create_github_runtime_and_client(settings: &Settings) -> Result<(Runtime, GitHubClient)> {
  let home = home_dir()?;
  octonote_gh::create_github_runtime_and_client(&home, &settings.api_base_url())
    .context("Failed to create GitHub client")
}
