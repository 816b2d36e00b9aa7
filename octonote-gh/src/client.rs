//! # GitHub HTTP Client
//!
//! HTTP client implementation for GitHub API interactions, handling
//! authentication, request building, pagination and response parsing for
//! GitHub REST API operations.

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::consts::{ACCEPT, API_VERSION, API_VERSION_HEADER, MAX_PAGES, PER_PAGE, USER_AGENT};
use crate::models::GitHubAuth;

/// Represents a GitHub API client
pub struct GitHubClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: GitHubAuth,
}

impl GitHubClient {
  /// Create a new GitHub client for the public API
  pub fn new(auth: GitHubAuth) -> Self {
    Self {
      client: Client::new(),
      base_url: octonote_core::config::DEFAULT_API_BASE_URL.to_string(),
      auth,
    }
  }

  /// Point the client at another API root, e.g. GitHub Enterprise
  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.trim_end_matches('/').to_string();
    self
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Test the GitHub connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let url = format!("{}/user", self.base_url);

    let response = self
      .request(Method::GET, &url)
      .send()
      .await
      .context("Failed to connect to GitHub")?;

    Ok(response.status().is_success())
  }

  /// Authenticated request with the standard GitHub headers
  pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
    self
      .client
      .request(method, url)
      .header(header::ACCEPT, ACCEPT)
      .header(header::USER_AGENT, USER_AGENT)
      .header(API_VERSION_HEADER, API_VERSION)
      .basic_auth(&self.auth.username, Some(&self.auth.token))
  }

  /// Fetch every page of a list endpoint, up to [`MAX_PAGES`] pages.
  pub(crate) async fn get_all_pages<T: DeserializeOwned>(
    &self,
    url: &str,
    query: &[(&str, &str)],
    resource: &str,
  ) -> Result<Vec<T>> {
    Ok(self.get_pages(url, query, resource).await?.items)
  }

  /// Fetch pages of a list endpoint until a page shorter than [`PER_PAGE`]
  /// comes back or [`MAX_PAGES`] pages have been read.
  pub(crate) async fn get_pages<T: DeserializeOwned>(
    &self,
    url: &str,
    query: &[(&str, &str)],
    resource: &str,
  ) -> Result<Listing<T>> {
    let per_page = PER_PAGE.to_string();
    let mut items = Vec::new();

    for page in 1..=MAX_PAGES {
      let page_param = page.to_string();
      trace!("GET {} page {}", url, page);

      let response = self
        .request(Method::GET, url)
        .query(query)
        .query(&[("per_page", per_page.as_str()), ("page", page_param.as_str())])
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;

      let batch: Vec<T> = decode_response(response, StatusCode::OK, resource).await?;
      let count = batch.len();
      items.extend(batch);

      if count < PER_PAGE {
        debug!("Fetched {} {} over {} page(s)", items.len(), resource, page);
        return Ok(Listing { items, truncated: false });
      }
    }

    warn!("Stopped listing {} after {} pages", resource, MAX_PAGES);
    Ok(Listing { items, truncated: true })
  }
}

/// Items of a paginated listing
pub(crate) struct Listing<T> {
  pub items: Vec<T>,
  /// Set when the page limit was reached before the last page
  pub truncated: bool,
}

/// Map a GitHub response onto the decoded body or a descriptive error.
///
/// `resource` names what was requested and is used in "not found" errors.
pub(crate) async fn decode_response<T: DeserializeOwned>(
  response: Response,
  expected: StatusCode,
  resource: &str,
) -> Result<T> {
  let status = response.status();
  debug!("GitHub API response status: {}", status);

  match status {
    s if s == expected => {
      let body = response.text().await.context("Failed to read response body")?;
      parse_body(&body, resource)
    }
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
      warn!("Authentication failed when accessing GitHub API");
      Err(anyhow::anyhow!(
        "Authentication failed. Please check your GitHub credentials."
      ))
    }
    StatusCode::NOT_FOUND => Err(anyhow::anyhow!("{resource} not found")),
    StatusCode::UNPROCESSABLE_ENTITY => {
      let body = response.text().await.unwrap_or_default();
      match api_message(&body) {
        Some(message) => Err(anyhow::anyhow!("Validation failed: {message}")),
        None => Err(anyhow::anyhow!("Validation failed")),
      }
    }
    _ => {
      let error_text = response.text().await.unwrap_or_default();
      warn!("Unexpected GitHub API error: HTTP {} - {}", status, error_text);
      Err(anyhow::anyhow!("Unexpected error: HTTP {status} - {error_text}"))
    }
  }
}

/// Decode a JSON body, surfacing GitHub's own error message when the shape
/// is not what we expected
fn parse_body<T: DeserializeOwned>(body: &str, resource: &str) -> Result<T> {
  serde_json::from_str::<T>(body).map_err(|e| match api_message(body) {
    Some(message) => anyhow::anyhow!("Failed to parse {resource}: GitHub API error: {message}"),
    None => anyhow::anyhow!("Failed to parse {resource}: {e}"),
  })
}

fn api_message(body: &str) -> Option<String> {
  let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
  value.get("message")?.as_str().map(str::to_string)
}

/// Create a GitHub client from credentials
pub fn create_github_client(username: &str, token: &str) -> GitHubClient {
  let auth = GitHubAuth {
    username: username.to_string(),
    token: token.to_string(),
  };

  GitHubClient::new(auth)
}
