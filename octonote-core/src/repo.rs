//! # Repository References
//!
//! Owner/name pairs for GitHub repositories and the two forms users may supply
//! them in: a URL, or an already structured `owner/name` reference.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Web host used when building links to issues and profiles
pub const GITHUB_WEB_URL: &str = "https://github.com";

static SHORTHAND_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([\w.-]+)/([\w.-]+)$").expect("Failed to compile repo shorthand regex"));

// git@github.com:owner/repo.git
static SCP_REMOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[\w.-]+@[\w.-]+:([\w.-]+)/([\w.-]+?)(?:\.git)?/?$").expect("Failed to compile SCP remote regex")
});

/// Errors that can occur while resolving a repository reference
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoRefError {
  #[error("Repository must be in 'owner/name' form: '{0}'")]
  InvalidShorthand(String),
  #[error("Could not extract owner and repo from URL: '{0}'")]
  InvalidUrl(String),
}

/// A GitHub repository identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
  pub owner: String,
  pub name: String,
}

impl RepoRef {
  pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      name: name.into(),
    }
  }

  /// Parse the `owner/name` form. A trailing `.git` is ignored.
  pub fn parse_shorthand(input: &str) -> Result<Self, RepoRefError> {
    let trimmed = input.trim();
    let captures = SHORTHAND_REGEX
      .captures(trimmed)
      .ok_or_else(|| RepoRefError::InvalidShorthand(trimmed.to_string()))?;

    let name = strip_git_suffix(&captures[2]);
    if name.is_empty() {
      return Err(RepoRefError::InvalidShorthand(trimmed.to_string()));
    }

    Ok(Self::new(&captures[1], name))
  }

  /// Browser URL of the repository
  pub fn html_url(&self) -> String {
    format!("{GITHUB_WEB_URL}/{}/{}", self.owner, self.name)
  }

  /// Browser URL of one of the repository's issues
  pub fn issue_url(&self, number: u32) -> String {
    format!("{}/issues/{number}", self.html_url())
  }
}

impl fmt::Display for RepoRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

impl FromStr for RepoRef {
  type Err = RepoRefError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.parse::<RepoTarget>()?.repo_ref()
  }
}

/// Where a repository reference came from.
///
/// URLs are kept verbatim until the owner and name are needed. Structured
/// references are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoTarget {
  /// A GitHub web or git remote URL
  Url(String),
  /// An owner/name pair, e.g. picked from the user's repository list
  Repo(RepoRef),
}

impl RepoTarget {
  /// Resolve the owner and name this target points at
  pub fn repo_ref(&self) -> Result<RepoRef, RepoRefError> {
    match self {
      RepoTarget::Url(url) => repo_from_url(url),
      RepoTarget::Repo(repo) => Ok(repo.clone()),
    }
  }
}

impl From<RepoRef> for RepoTarget {
  fn from(repo: RepoRef) -> Self {
    RepoTarget::Repo(repo)
  }
}

impl FromStr for RepoTarget {
  type Err = RepoRefError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if looks_like_url(trimmed) {
      // Validate eagerly so bad input is reported where it was typed
      repo_from_url(trimmed)?;
      Ok(RepoTarget::Url(trimmed.to_string()))
    } else {
      RepoRef::parse_shorthand(trimmed).map(RepoTarget::Repo)
    }
  }
}

fn looks_like_url(input: &str) -> bool {
  input.contains("://") || SCP_REMOTE_REGEX.is_match(input)
}

fn strip_git_suffix(name: &str) -> &str {
  name.strip_suffix(".git").unwrap_or(name)
}

/// Extract owner and name from a repository URL.
///
/// Supports `https://host/owner/repo(.git)`, deeper paths such as
/// `https://host/owner/repo/issues/3`, and SCP-style SSH remotes. Any host is
/// accepted since the API may point at a GitHub Enterprise instance.
pub fn repo_from_url(input: &str) -> Result<RepoRef, RepoRefError> {
  let invalid = || RepoRefError::InvalidUrl(input.to_string());

  if let Some(captures) = SCP_REMOTE_REGEX.captures(input) {
    return Ok(RepoRef::new(&captures[1], &captures[2]));
  }

  let url = Url::parse(input).map_err(|_| invalid())?;
  let mut segments = url.path_segments().ok_or_else(invalid)?.filter(|s| !s.is_empty());

  let owner = segments.next().ok_or_else(invalid)?;
  let name = strip_git_suffix(segments.next().ok_or_else(invalid)?);
  if name.is_empty() {
    return Err(invalid());
  }

  Ok(RepoRef::new(owner, name))
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;

  #[test_case("https://github.com/octocat/hello-world" ; "https")]
  #[test_case("https://github.com/octocat/hello-world.git" ; "https with git suffix")]
  #[test_case("https://github.com/octocat/hello-world/" ; "trailing slash")]
  #[test_case("https://github.com/octocat/hello-world/issues/12" ; "deeper path")]
  #[test_case("git@github.com:octocat/hello-world.git" ; "scp remote")]
  #[test_case("ssh://git@github.com/octocat/hello-world.git" ; "ssh url")]
  #[test_case("https://github.example.com/octocat/hello-world" ; "enterprise host")]
  fn test_repo_from_url(input: &str) {
    assert_eq!(repo_from_url(input).unwrap(), RepoRef::new("octocat", "hello-world"));
  }

  #[test]
  fn test_repo_from_url_invalid() {
    assert!(repo_from_url("https://github.com/only-owner").is_err());
    assert!(repo_from_url("https://github.com/").is_err());
    assert!(repo_from_url("not a url").is_err());
  }

  #[test]
  fn test_parse_shorthand() {
    assert_eq!(
      RepoRef::parse_shorthand("octocat/hello-world").unwrap(),
      RepoRef::new("octocat", "hello-world")
    );
    assert_eq!(
      RepoRef::parse_shorthand(" octocat/hello.world.git ").unwrap(),
      RepoRef::new("octocat", "hello.world")
    );
  }

  #[test]
  fn test_parse_shorthand_invalid() {
    assert!(RepoRef::parse_shorthand("octocat").is_err());
    assert!(RepoRef::parse_shorthand("a/b/c").is_err());
    assert!(RepoRef::parse_shorthand("octocat/").is_err());
    assert!(RepoRef::parse_shorthand("octo cat/repo").is_err());
    assert!(RepoRef::parse_shorthand("octocat/.git").is_err());
  }

  #[test]
  fn test_repo_target_variants() {
    let url: RepoTarget = "https://github.com/octocat/hello-world.git".parse().unwrap();
    assert!(matches!(url, RepoTarget::Url(_)));
    assert_eq!(url.repo_ref().unwrap(), RepoRef::new("octocat", "hello-world"));

    let scp: RepoTarget = "git@github.com:octocat/hello-world.git".parse().unwrap();
    assert!(matches!(scp, RepoTarget::Url(_)));

    let repo: RepoTarget = "octocat/hello-world".parse().unwrap();
    assert_eq!(repo, RepoTarget::Repo(RepoRef::new("octocat", "hello-world")));
  }

  #[test]
  fn test_repo_target_rejects_bad_url_eagerly() {
    let err = "https://github.com/octocat".parse::<RepoTarget>().unwrap_err();
    assert!(matches!(err, RepoRefError::InvalidUrl(_)));
  }

  #[test]
  fn test_links() {
    let repo = RepoRef::new("octocat", "hello-world");
    assert_eq!(repo.to_string(), "octocat/hello-world");
    assert_eq!(repo.html_url(), "https://github.com/octocat/hello-world");
    assert_eq!(repo.issue_url(7), "https://github.com/octocat/hello-world/issues/7");
  }
}
