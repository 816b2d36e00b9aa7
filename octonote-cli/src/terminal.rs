//! Terminal rendering of issues for `octonote render` and `octonote issue show`.

use chrono::{DateTime, Utc};
use octonote_core::config::Appearance;
use octonote_core::output::{format_issue_number, format_label, format_login};
use octonote_core::time::human_time_delta;
use octonote_gh::{GitHubComment, GitHubIssue};
use owo_colors::OwoColorize;

/// Whether `issue` matches a case-insensitive search over its title, labels
/// and author. An empty query matches everything.
pub fn matches_filter(issue: &GitHubIssue, query: &str) -> bool {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return true;
  }

  issue.title.to_lowercase().contains(&query)
    || issue.user.login.to_lowercase().contains(&query)
    || issue.label_names().any(|name| name.to_lowercase().contains(&query))
}

/// Issue as shown in a terminal listing
pub fn format_issue(issue: &GitHubIssue, appearance: Appearance, now: DateTime<Utc>) -> String {
  let age = human_time_delta(issue.created_at, now);

  match appearance {
    Appearance::Default => {
      let mut title_line = issue.title.bold().to_string();
      for label in &issue.labels {
        title_line.push(' ');
        title_line.push_str(&format_label(&label.name, &label.color));
      }
      format!(
        "{title_line}\n  {} opened {age} by {}",
        format_issue_number(issue.number),
        format_login(&issue.user.login)
      )
    }
    Appearance::Compact => {
      let opened = format!("Opened {age} by {}", issue.user.login);
      format!(
        "{} • {}\n  {}",
        format_issue_number(issue.number),
        issue.title,
        opened.dimmed()
      )
    }
  }
}

/// Full issue view with body and comments
pub fn format_issue_details(issue: &GitHubIssue, comments: &[GitHubComment], now: DateTime<Utc>) -> String {
  let mut out = format_issue(issue, Appearance::Default, now);

  out.push_str(&format!("\n  State: {}", octonote_core::output::format_issue_state(&issue.state)));
  match &issue.assignee {
    Some(assignee) => out.push_str(&format!("\n  Assignee: {}", format_login(&assignee.login))),
    None => out.push_str("\n  Assignee: none"),
  }
  out.push_str(&format!("\n  {}", issue.html_url.underline()));

  let body = issue.body.as_deref().map(str::trim).unwrap_or_default();
  out.push_str("\n\n");
  if body.is_empty() {
    out.push_str(&"No description provided.".dimmed().to_string());
  } else {
    out.push_str(body);
  }

  if !comments.is_empty() {
    out.push_str(&format!("\n\n{}", format!("Comments ({})", comments.len()).bold()));
    for comment in comments {
      out.push_str(&format!(
        "\n\n{} commented {}\n{}",
        format_login(&comment.user.login),
        human_time_delta(comment.created_at, now),
        comment.body.trim()
      ));
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn issue() -> GitHubIssue {
    serde_json::from_value(json!({
      "number": 12,
      "title": "Crash when saving",
      "body": "Steps to reproduce",
      "html_url": "https://github.com/owner/repo/issues/12",
      "state": "open",
      "user": { "login": "Alice", "id": 1 },
      "labels": [{ "name": "Bug", "color": "d73a4a" }, { "name": "help wanted", "color": "008672" }],
      "created_at": "2024-05-01T08:00:00Z",
      "updated_at": "2024-05-01T08:00:00Z"
    }))
    .unwrap()
  }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()
  }

  #[test]
  fn test_filter_matches_title_labels_and_author() {
    let issue = issue();
    assert!(matches_filter(&issue, ""));
    assert!(matches_filter(&issue, "crash"));
    assert!(matches_filter(&issue, "BUG"));
    assert!(matches_filter(&issue, "wanted"));
    assert!(matches_filter(&issue, "alice"));
    assert!(!matches_filter(&issue, "feature"));
  }

  #[test]
  fn test_format_issue_default() {
    let out = format_issue(&issue(), Appearance::Default, now());
    assert!(out.contains("Crash when saving"));
    assert!(out.contains(" Bug "));
    assert!(out.contains("#12"));
    assert!(out.contains("opened 3 hours ago by"));
  }

  #[test]
  fn test_format_issue_compact() {
    let out = format_issue(&issue(), Appearance::Compact, now());
    assert!(out.contains("• Crash when saving"));
    assert!(out.contains("Opened 3 hours ago by Alice"));
    assert!(!out.contains(" Bug "));
  }

  #[test]
  fn test_format_issue_details() {
    let comment: GitHubComment = serde_json::from_value(json!({
      "id": 1,
      "user": { "login": "bob", "id": 2 },
      "body": "Can reproduce",
      "html_url": "https://github.com/owner/repo/issues/12#issuecomment-1",
      "created_at": "2024-05-01T10:00:00Z"
    }))
    .unwrap();

    let out = format_issue_details(&issue(), &[comment], now());
    assert!(out.contains("Steps to reproduce"));
    assert!(out.contains("Assignee: none"));
    assert!(out.contains("Comments (1)"));
    assert!(out.contains("commented 1 hour ago"));
    assert!(out.contains("Can reproduce"));
  }
}
