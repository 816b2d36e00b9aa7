//! GitHub issue comment endpoints.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::json;
use tracing::{info, instrument, trace};

use crate::client::{GitHubClient, decode_response};
use crate::models::GitHubComment;

impl GitHubClient {
  /// List the comments on an issue, oldest first
  #[instrument(skip(self), level = "debug")]
  pub async fn list_comments(&self, owner: &str, repo: &str, issue_number: u32) -> Result<Vec<GitHubComment>> {
    let url = format!(
      "{}/repos/{}/{}/issues/{}/comments",
      self.base_url, owner, repo, issue_number
    );
    trace!("GitHub API URL: {}", url);

    let resource = format!("Issue #{issue_number} for {owner}/{repo}");
    self.get_all_pages(&url, &[], &resource).await
  }

  /// Post a comment on an issue
  #[instrument(skip(self, body), level = "debug")]
  pub async fn create_comment(&self, owner: &str, repo: &str, issue_number: u32, body: &str) -> Result<GitHubComment> {
    info!("Commenting on issue #{} in {}/{}", issue_number, owner, repo);

    let url = format!(
      "{}/repos/{}/{}/issues/{}/comments",
      self.base_url, owner, repo, issue_number
    );

    let response = self
      .request(Method::POST, &url)
      .json(&json!({ "body": body }))
      .send()
      .await
      .context(format!("POST {url} failed"))?;

    let resource = format!("Issue #{issue_number} for {owner}/{repo}");
    decode_response(response, StatusCode::CREATED, &resource).await
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::tests::mock_client;

  fn comment_json(id: u64, body: &str) -> serde_json::Value {
    json!({
      "id": id,
      "user": { "login": "hubot", "id": 2 },
      "body": body,
      "html_url": format!("https://github.com/owner/repo/issues/5#issuecomment-{id}"),
      "created_at": "2024-02-01T10:00:00Z"
    })
  }

  #[tokio::test]
  async fn test_list_comments() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/5/comments"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        comment_json(1, "First!"),
        comment_json(2, "Fixed in main"),
      ])))
      .mount(&mock_server)
      .await;

    let comments = mock_client(&mock_server).list_comments("owner", "repo", 5).await?;

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].body, "Fixed in main");
    assert_eq!(comments[0].user.login, "hubot");
    Ok(())
  }

  #[tokio::test]
  async fn test_create_comment() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/repos/owner/repo/issues/5/comments"))
      .and(body_json(json!({ "body": "Thanks!" })))
      .respond_with(ResponseTemplate::new(201).set_body_json(comment_json(3, "Thanks!")))
      .expect(1)
      .mount(&mock_server)
      .await;

    let comment = mock_client(&mock_server)
      .create_comment("owner", "repo", 5, "Thanks!")
      .await?;
    assert_eq!(comment.id, 3);
    Ok(())
  }

  #[tokio::test]
  async fn test_create_comment_on_missing_issue() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/repos/owner/repo/issues/99/comments"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    let err = mock_client(&mock_server)
      .create_comment("owner", "repo", 99, "Hello")
      .await
      .unwrap_err();
    assert!(err.to_string().contains("Issue #99 for owner/repo not found"));
    Ok(())
  }
}
