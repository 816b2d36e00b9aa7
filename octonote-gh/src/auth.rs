//! Authentication helpers for the GitHub client.
//!
//! Convenience functions for loading credentials from the user's `.netrc` and
//! creating ready-to-use GitHub clients.

use std::path::Path;

use anyhow::{Context, Result};
use octonote_core::creds::{self, Credentials, GITHUB_MACHINE};
use tokio::runtime::Runtime;

use crate::{GitHubClient, create_github_client};

/// Load GitHub credentials from `.netrc`.
pub fn get_github_credentials(home: &Path) -> Result<Credentials> {
  creds::get_github_credentials(home)?.ok_or_else(|| {
    anyhow::anyhow!(
      "GitHub credentials not found in .netrc file. Please run 'octonote creds setup' or add credentials for machine \
       '{GITHUB_MACHINE}'."
    )
  })
}

/// Creates an authenticated GitHub client using credentials from .netrc.
pub fn create_github_client_from_netrc(home: &Path, base_url: &str) -> Result<GitHubClient> {
  let credentials = get_github_credentials(home).context("Failed to get credentials")?;

  Ok(create_github_client(&credentials.username, &credentials.password).with_base_url(base_url))
}

/// Creates a tokio runtime and an authenticated GitHub client.
pub fn create_github_runtime_and_client(home: &Path, base_url: &str) -> Result<(Runtime, GitHubClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_github_client_from_netrc(home, base_url)?;
  Ok((rt, client))
}
