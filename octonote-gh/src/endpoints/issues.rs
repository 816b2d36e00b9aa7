//! GitHub Issues API endpoint implementations.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, instrument, trace};

use crate::client::{GitHubClient, Listing, decode_response};
use crate::models::{GitHubIssue, IssueState, IssueUpdate, NewIssue};

impl GitHubClient {
  /// List every open issue of a repository, excluding pull requests.
  ///
  /// At most `MAX_PAGES` pages of `PER_PAGE` entries are read, so a
  /// repository with more open issues than that is listed partially.
  ///
  /// # Errors
  ///
  /// Returns an error if the repository is not found, authentication fails,
  /// the request cannot be sent, or the response cannot be parsed.
  #[instrument(skip(self), level = "debug")]
  pub async fn list_open_issues(&self, owner: &str, repo: &str) -> Result<Vec<GitHubIssue>> {
    Ok(self.open_issues(owner, repo).await?.items)
  }

  async fn open_issues(&self, owner: &str, repo: &str) -> Result<Listing<GitHubIssue>> {
    info!("Fetching open issues for {}/{}", owner, repo);

    let url = format!("{}/repos/{}/{}/issues", self.base_url, owner, repo);
    trace!("GitHub API URL: {}", url);

    let resource = format!("Repository {owner}/{repo}");
    let listing: Listing<GitHubIssue> = self.get_pages(&url, &[("state", "open")], &resource).await?;

    let total = listing.items.len();
    let items: Vec<GitHubIssue> = listing
      .items
      .into_iter()
      .filter(|issue| !issue.is_pull_request())
      .collect();
    debug!("Kept {} of {} entries after dropping pull requests", items.len(), total);

    Ok(Listing {
      items,
      truncated: listing.truncated,
    })
  }

  /// Open issues with the given numbers, in the order the numbers are listed.
  ///
  /// Numbers that are closed, missing, or pull requests are skipped. When the
  /// open issue listing hits the page limit, numbers not found in it are
  /// fetched one by one.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issues_by_number(&self, owner: &str, repo: &str, numbers: &[u32]) -> Result<Vec<GitHubIssue>> {
    let Listing {
      items: mut open,
      truncated,
    } = self.open_issues(owner, repo).await?;

    let mut selected = Vec::with_capacity(numbers.len());
    for number in numbers {
      if let Some(pos) = open.iter().position(|issue| issue.number == *number) {
        selected.push(open.swap_remove(pos));
      } else if truncated {
        debug!("Issue #{} is past the listing limit, fetching it directly", number);
        match self.get_issue(owner, repo, *number).await {
          Ok(issue) if issue.state == "open" && !issue.is_pull_request() => selected.push(issue),
          Ok(_) => debug!("Issue #{} is not an open issue of {}/{}", number, owner, repo),
          Err(e) => debug!("Skipping issue #{}: {}", number, e),
        }
      } else {
        debug!("Issue #{} is not an open issue of {}/{}", number, owner, repo);
      }
    }

    Ok(selected)
  }

  /// Get a specific issue by number.
  ///
  /// # Errors
  ///
  /// Returns an error if the issue is not found, authentication fails,
  /// the request cannot be sent, or the response cannot be parsed.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, owner: &str, repo: &str, issue_number: u32) -> Result<GitHubIssue> {
    info!("Fetching issue #{} for {}/{}", issue_number, owner, repo);

    let url = format!("{}/repos/{}/{}/issues/{}", self.base_url, owner, repo, issue_number);
    trace!("GitHub API URL: {}", url);

    let response = self
      .request(Method::GET, &url)
      .send()
      .await
      .context(format!("GET {url} failed"))?;

    let resource = format!("Issue #{issue_number} for {owner}/{repo}");
    let issue: GitHubIssue = decode_response(response, StatusCode::OK, &resource).await?;
    trace!("Issue: {:?}", issue);
    Ok(issue)
  }

  /// Create a new issue.
  #[instrument(skip(self, new_issue), level = "debug")]
  pub async fn create_issue(&self, owner: &str, repo: &str, new_issue: &NewIssue) -> Result<GitHubIssue> {
    info!("Creating issue '{}' in {}/{}", new_issue.title, owner, repo);

    let url = format!("{}/repos/{}/{}/issues", self.base_url, owner, repo);

    let response = self
      .request(Method::POST, &url)
      .json(new_issue)
      .send()
      .await
      .context(format!("POST {url} failed"))?;

    let resource = format!("Repository {owner}/{repo}");
    let issue: GitHubIssue = decode_response(response, StatusCode::CREATED, &resource).await?;
    info!("Created issue #{}", issue.number);
    Ok(issue)
  }

  /// Apply a partial update to an issue.
  #[instrument(skip(self, update), level = "debug")]
  pub async fn update_issue(&self, owner: &str, repo: &str, issue_number: u32, update: &IssueUpdate) -> Result<GitHubIssue> {
    info!("Updating issue #{} in {}/{}", issue_number, owner, repo);

    let url = format!("{}/repos/{}/{}/issues/{}", self.base_url, owner, repo, issue_number);

    let response = self
      .request(Method::PATCH, &url)
      .json(update)
      .send()
      .await
      .context(format!("PATCH {url} failed"))?;

    let resource = format!("Issue #{issue_number} for {owner}/{repo}");
    decode_response(response, StatusCode::OK, &resource).await
  }

  /// Close an issue.
  pub async fn close_issue(&self, owner: &str, repo: &str, issue_number: u32) -> Result<GitHubIssue> {
    let update = IssueUpdate {
      state: Some(IssueState::Closed),
      ..Default::default()
    };
    self.update_issue(owner, repo, issue_number, &update).await
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{body_json, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::tests::mock_client;
  use crate::consts::{MAX_PAGES, PER_PAGE};
  use crate::models::tests::issue_json;

  fn pull_request_json(number: u32) -> serde_json::Value {
    let mut value = issue_json(number, "A pull request");
    value["pull_request"] = json!({ "url": format!("https://api.github.com/repos/owner/repo/pulls/{number}") });
    value
  }

  #[tokio::test]
  async fn test_list_open_issues_filters_pull_requests() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .and(query_param("state", "open"))
      .and(query_param("per_page", "100"))
      .and(query_param("page", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        issue_json(1, "First"),
        pull_request_json(2),
        issue_json(3, "Third"),
      ])))
      .mount(&mock_server)
      .await;

    let issues = mock_client(&mock_server).list_open_issues("owner", "repo").await?;

    let numbers: Vec<u32> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![1, 3]);
    Ok(())
  }

  #[tokio::test]
  async fn test_list_open_issues_follows_pages() -> Result<()> {
    let mock_server = MockServer::start().await;

    let first_page: Vec<_> = (1..=PER_PAGE as u32).map(|n| issue_json(n, "Issue")).collect();
    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .and(query_param("page", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!(first_page)))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .and(query_param("page", "2"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue_json(101, "Last")])))
      .expect(1)
      .mount(&mock_server)
      .await;

    let issues = mock_client(&mock_server).list_open_issues("owner", "repo").await?;

    assert_eq!(issues.len(), 101);
    assert_eq!(issues.last().map(|i| i.number), Some(101));
    Ok(())
  }

  #[tokio::test]
  async fn test_list_open_issues_repo_not_found() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/missing/issues"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
      .mount(&mock_server)
      .await;

    let err = mock_client(&mock_server)
      .list_open_issues("owner", "missing")
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "Repository owner/missing not found");
    Ok(())
  }

  #[tokio::test]
  async fn test_get_issues_by_number_keeps_requested_order() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        issue_json(1, "One"),
        issue_json(3, "Three"),
        issue_json(5, "Five"),
        pull_request_json(7),
      ])))
      .mount(&mock_server)
      .await;

    let issues = mock_client(&mock_server)
      .get_issues_by_number("owner", "repo", &[5, 2, 1, 7])
      .await?;

    let numbers: Vec<u32> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![5, 1]);
    Ok(())
  }

  #[tokio::test]
  async fn test_get_issues_by_number_past_page_limit() -> Result<()> {
    let mock_server = MockServer::start().await;

    let full_page: Vec<_> = (1..=PER_PAGE as u32).map(|n| issue_json(n, "Issue")).collect();
    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!(full_page)))
      .expect(u64::from(MAX_PAGES))
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/9000"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(9000, "Far away")))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/9001"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
      .mount(&mock_server)
      .await;

    let issues = mock_client(&mock_server)
      .get_issues_by_number("owner", "repo", &[9000, 2, 9001])
      .await?;

    let numbers: Vec<u32> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![9000, 2]);
    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_success() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/123"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(123, "Test Issue")))
      .mount(&mock_server)
      .await;

    let issue = mock_client(&mock_server).get_issue("owner", "repo", 123).await?;

    assert_eq!(issue.number, 123);
    assert_eq!(issue.title, "Test Issue");
    assert_eq!(issue.state, "open");
    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/404"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    let result = mock_client(&mock_server).get_issue("owner", "repo", 404).await;
    assert!(result.unwrap_err().to_string().contains("Issue #404 for owner/repo not found"));
    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unauthorized() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/1"))
      .respond_with(ResponseTemplate::new(403))
      .mount(&mock_server)
      .await;

    let err = mock_client(&mock_server).get_issue("owner", "repo", 1).await.unwrap_err();
    assert_eq!(
      err.to_string(),
      "Authentication failed. Please check your GitHub credentials."
    );
    Ok(())
  }

  #[tokio::test]
  async fn test_create_issue() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/repos/owner/repo/issues"))
      .and(body_json(json!({
        "title": "New bug",
        "body": "Steps to reproduce",
        "labels": ["bug"],
        "assignees": ["owner"]
      })))
      .respond_with(ResponseTemplate::new(201).set_body_json(issue_json(42, "New bug")))
      .mount(&mock_server)
      .await;

    let new_issue = NewIssue {
      title: "New bug".to_string(),
      body: Some("Steps to reproduce".to_string()),
      labels: vec!["bug".to_string()],
      assignees: vec!["owner".to_string()],
    };
    let issue = mock_client(&mock_server).create_issue("owner", "repo", &new_issue).await?;

    assert_eq!(issue.number, 42);
    Ok(())
  }

  #[tokio::test]
  async fn test_create_issue_validation_failed() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/repos/owner/repo/issues"))
      .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "Title can't be blank" })))
      .mount(&mock_server)
      .await;

    let err = mock_client(&mock_server)
      .create_issue("owner", "repo", &NewIssue::default())
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "Validation failed: Title can't be blank");
    Ok(())
  }

  #[tokio::test]
  async fn test_close_issue() -> Result<()> {
    let mock_server = MockServer::start().await;

    let mut closed = issue_json(9, "Done");
    closed["state"] = json!("closed");

    Mock::given(method("PATCH"))
      .and(path("/repos/owner/repo/issues/9"))
      .and(body_json(json!({ "state": "closed" })))
      .respond_with(ResponseTemplate::new(200).set_body_json(closed))
      .expect(1)
      .mount(&mock_server)
      .await;

    let issue = mock_client(&mock_server).close_issue("owner", "repo", 9).await?;
    assert_eq!(issue.state, "closed");
    Ok(())
  }

  #[tokio::test]
  async fn test_unexpected_status() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues/1"))
      .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
      .mount(&mock_server)
      .await;

    let err = mock_client(&mock_server).get_issue("owner", "repo", 1).await.unwrap_err();
    assert_eq!(err.to_string(), "Unexpected error: HTTP 500 Internal Server Error - boom");
    Ok(())
  }
}
