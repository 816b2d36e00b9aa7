//! Repository label endpoints.

use anyhow::Result;
use tracing::{instrument, trace};

use crate::client::GitHubClient;
use crate::models::GitHubLabel;

impl GitHubClient {
  /// List all labels defined in a repository
  #[instrument(skip(self), level = "debug")]
  pub async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>> {
    let url = format!("{}/repos/{}/{}/labels", self.base_url, owner, repo);
    trace!("GitHub API URL: {}", url);

    let resource = format!("Repository {owner}/{repo}");
    self.get_all_pages(&url, &[], &resource).await
  }
}
