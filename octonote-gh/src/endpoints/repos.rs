//! Repositories of the authenticated user.

use anyhow::Result;
use tracing::{info, instrument};

use crate::client::GitHubClient;
use crate::models::GitHubRepository;

impl GitHubClient {
  /// List repositories the authenticated user owns or collaborates on,
  /// most recently updated first
  #[instrument(skip(self), level = "debug")]
  pub async fn list_user_repos(&self) -> Result<Vec<GitHubRepository>> {
    info!("Fetching repositories for the authenticated user");

    let url = format!("{}/user/repos", self.base_url);
    self
      .get_all_pages(&url, &[("sort", "updated")], "Repository list")
      .await
  }
}
