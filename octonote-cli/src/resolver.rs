//! Turns an embed block's request into concrete issues.

use anyhow::Result;
use octonote_core::embed::EmbedSpec;
use octonote_gh::{GitHubClient, GitHubIssue};
use tracing::{debug, instrument};

/// Open issues an embed block shows.
///
/// With issue numbers, only those issues are returned, in the order they were
/// listed. Without, every open issue of the repository is. Pull requests are
/// never included.
#[instrument(skip(client), level = "debug")]
pub async fn resolve_embed(client: &GitHubClient, spec: &EmbedSpec) -> Result<Vec<GitHubIssue>> {
  let repo = &spec.repo;

  let issues = if spec.issues.is_empty() {
    client.list_open_issues(&repo.owner, &repo.name).await?
  } else {
    client
      .get_issues_by_number(&repo.owner, &repo.name, spec.issues.as_slice())
      .await?
  };

  debug!("Resolved {} issue(s) for {}", issues.len(), repo);
  Ok(issues)
}
