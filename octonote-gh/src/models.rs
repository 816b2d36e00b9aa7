use chrono::{DateTime, Utc};
use octonote_core::embed::EmbeddableIssue;
use octonote_core::repo::{GITHUB_WEB_URL, RepoRef};
use serde::{Deserialize, Serialize};

/// Represents GitHub authentication credentials
#[derive(Clone)]
pub struct GitHubAuth {
  pub username: String,
  pub token: String,
}

/// Represents a GitHub user
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
  pub login: String,
  pub id: u64,
  pub name: Option<String>,
  pub html_url: Option<String>,
}

impl GitHubUser {
  /// Profile link, falling back to the public web host
  pub fn profile_url(&self) -> String {
    self
      .html_url
      .clone()
      .unwrap_or_else(|| format!("{GITHUB_WEB_URL}/{}", self.login))
  }
}

/// Represents a repository label
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLabel {
  pub name: String,
  /// Six digit hex color without the leading `#`
  #[serde(default)]
  pub color: String,
  pub description: Option<String>,
}

/// Represents a GitHub issue.
///
/// The issues endpoints also return pull requests; those carry a
/// `pull_request` object.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
  pub number: u32,
  pub title: String,
  pub body: Option<String>,
  pub html_url: String,
  pub state: String,
  pub user: GitHubUser,
  #[serde(default)]
  pub labels: Vec<GitHubLabel>,
  pub assignee: Option<GitHubUser>,
  #[serde(default)]
  pub assignees: Vec<GitHubUser>,
  #[serde(default)]
  pub comments: u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
  pub fn is_pull_request(&self) -> bool {
    self.pull_request.is_some()
  }

  pub fn label_names(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(|l| l.name.as_str())
  }
}

impl EmbeddableIssue for GitHubIssue {
  fn number(&self) -> u32 {
    self.number
  }

  fn title(&self) -> &str {
    &self.title
  }

  fn author(&self) -> &str {
    &self.user.login
  }

  fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  fn html_url(&self) -> &str {
    &self.html_url
  }
}

/// Represents a comment on an issue
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubComment {
  pub id: u64,
  pub user: GitHubUser,
  #[serde(default)]
  pub body: String,
  pub html_url: String,
  pub created_at: DateTime<Utc>,
}

/// Represents a repository the user can access
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepository {
  pub id: u64,
  pub name: String,
  pub full_name: String,
  pub owner: GitHubUser,
  pub html_url: String,
  pub description: Option<String>,
  pub language: Option<String>,
  #[serde(default)]
  pub private: bool,
  #[serde(default)]
  pub open_issues_count: u32,
  pub updated_at: Option<DateTime<Utc>>,
}

impl GitHubRepository {
  pub fn repo_ref(&self) -> RepoRef {
    RepoRef::new(&self.owner.login, &self.name)
  }
}

/// Issue state as accepted by the update endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
  Open,
  Closed,
}

/// Body of a create issue request
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewIssue {
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub labels: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub assignees: Vec<String>,
}

/// Body of an update issue request. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub state: Option<IssueState>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub labels: Option<Vec<String>>,
}
