//! # Embed Updates
//!
//! Refreshes the materialized issue lists of every embed block in a note.
//! A force update rewrites them all. A soft update respects each block's
//! cooldown and leaves a list alone when its issue numbers and titles still
//! match GitHub.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use octonote_core::config::{Settings, get_config_dirs};
use octonote_core::embed::{locate_blocks, render_markdown, rendered_issues, replace_rendered};
use octonote_core::refresh::RefreshState;
use octonote_core::repo::RepoRef;
use octonote_gh::GitHubClient;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::resolver::resolve_embed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
  /// Rewrite every block unconditionally
  Force,
  /// Throttled, change-detecting refresh
  Soft,
}

/// What happened to one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
  Rewritten { issues: usize },
  Unchanged,
  Throttled { remaining: TimeDelta },
  Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
  pub index: usize,
  pub repo: Option<RepoRef>,
  pub status: BlockStatus,
}

/// Result of updating a document
#[derive(Debug, Clone)]
pub struct UpdateReport {
  pub document: String,
  /// One entry per block, in document order
  pub outcomes: Vec<BlockOutcome>,
}

impl UpdateReport {
  /// Whether any materialized list was rewritten
  pub fn changed(&self) -> bool {
    self
      .outcomes
      .iter()
      .any(|o| matches!(o.status, BlockStatus::Rewritten { .. }))
  }

  /// Whether at least one block was checked against GitHub
  pub fn fetched(&self) -> bool {
    self
      .outcomes
      .iter()
      .any(|o| matches!(o.status, BlockStatus::Rewritten { .. } | BlockStatus::Unchanged))
  }
}

/// Update every embed block of `doc`.
///
/// `doc_key` identifies the document in `state`. Blocks are processed from
/// the last to the first so earlier line positions stay valid while the text
/// is rewritten. A block with an unusable repository line is reported and
/// skipped. Failing to fetch a block's issues aborts the update.
pub async fn update_document(
  client: &GitHubClient,
  doc: &str,
  doc_key: &Path,
  mode: UpdateMode,
  settings: &Settings,
  state: &mut RefreshState,
  now: DateTime<Utc>,
) -> Result<UpdateReport> {
  let blocks = locate_blocks(doc);
  info!("Updating {} embed block(s) in {}", blocks.len(), doc_key.display());

  let mut document = doc.to_string();
  let mut outcomes = Vec::with_capacity(blocks.len());

  for block in blocks.iter().rev() {
    let spec = match block.spec() {
      Ok(spec) => spec,
      Err(e) => {
        warn!("Skipping embed block {}: {}", block.index, e);
        outcomes.push(BlockOutcome {
          index: block.index,
          repo: None,
          status: BlockStatus::Invalid(e.to_string()),
        });
        continue;
      }
    };

    let key = RefreshState::key(doc_key, block.index);
    let mut throttle = state.throttle(&key, settings.refresh_cooldown_secs);

    if mode == UpdateMode::Soft
      && let Some(remaining) = throttle.remaining(now)
    {
      debug!("Block {} refreshed recently, {}s left", block.index, remaining.num_seconds());
      outcomes.push(BlockOutcome {
        index: block.index,
        repo: Some(spec.repo),
        status: BlockStatus::Throttled { remaining },
      });
      continue;
    }

    let issues = resolve_embed(client, &spec)
      .await
      .with_context(|| format!("Failed to fetch issues for {}", spec.repo))?;
    throttle.mark(now);
    state.record(&key, &throttle);

    if mode == UpdateMode::Soft && block.rendered.is_some() {
      let fetched: Vec<(u32, String)> = issues.iter().map(|i| (i.number, i.title.clone())).collect();
      if fetched == rendered_issues(&document, block) {
        debug!("Block {} is up to date", block.index);
        outcomes.push(BlockOutcome {
          index: block.index,
          repo: Some(spec.repo),
          status: BlockStatus::Unchanged,
        });
        continue;
      }
    }

    let rendered = render_markdown(&issues, settings.appearance);
    document = replace_rendered(&document, block, &rendered);
    outcomes.push(BlockOutcome {
      index: block.index,
      repo: Some(spec.repo),
      status: BlockStatus::Rewritten { issues: issues.len() },
    });
  }

  outcomes.reverse();
  Ok(UpdateReport { document, outcomes })
}

/// Update the note at `path` in place.
///
/// Refresh timestamps are kept in the data directory, keyed by the note's
/// canonical path. The note is only written when a list changed.
pub fn update_file(
  rt: &Runtime,
  client: &GitHubClient,
  path: &Path,
  mode: UpdateMode,
  settings: &Settings,
) -> Result<UpdateReport> {
  let doc = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let doc_key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

  let state_path = get_config_dirs()?.refresh_state_path();
  let mut state = RefreshState::load(&state_path)?;

  let report = rt.block_on(update_document(
    client,
    &doc,
    &doc_key,
    mode,
    settings,
    &mut state,
    Utc::now(),
  ))?;

  if report.changed() {
    fs::write(path, &report.document).with_context(|| format!("Failed to write {}", path.display()))?;
  }
  state.save(&state_path)?;

  Ok(report)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use octonote_core::config::Appearance;
  use octonote_core::embed::RENDER_BEGIN;
  use octonote_gh::create_github_client;
  use serde_json::json;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::resolver::tests::issue_json;

  const DOC: &str = "# Notes\n\n```github-issues\nowner/repo #1,2\n```\n\nTrailing text\n";

  fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + TimeDelta::seconds(secs)
  }

  fn compact() -> Settings {
    Settings {
      appearance: Appearance::Compact,
      ..Settings::default()
    }
  }

  async fn server(issues: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issues))
      .mount(&server)
      .await;
    server
  }

  fn client(server: &MockServer) -> GitHubClient {
    create_github_client("user", "token").with_base_url(&server.uri())
  }

  #[tokio::test]
  async fn test_force_update_materializes_list() -> Result<()> {
    let server = server(json!([issue_json(1, "One"), issue_json(2, "Two")])).await;
    let mut state = RefreshState::default();

    let report = update_document(
      &client(&server),
      DOC,
      Path::new("notes.md"),
      UpdateMode::Force,
      &compact(),
      &mut state,
      at(0),
    )
    .await?;

    assert!(report.changed());
    assert_eq!(
      report.document,
      "# Notes\n\n```github-issues\nowner/repo #1,2\n```\n\
       <!-- github-issues:begin -->\n\
       - [#1 • \"One\"](https://github.com/owner/repo/issues/1)\n\
       - [#2 • \"Two\"](https://github.com/owner/repo/issues/2)\n\
       <!-- github-issues:end -->\n\nTrailing text\n"
    );
    assert_eq!(state.len(), 1);
    Ok(())
  }

  #[tokio::test]
  async fn test_soft_update_without_changes_leaves_document() -> Result<()> {
    let server = server(json!([issue_json(1, "One"), issue_json(2, "Two")])).await;
    let client = client(&server);
    let mut state = RefreshState::default();
    let key = Path::new("notes.md");

    let first = update_document(&client, DOC, key, UpdateMode::Force, &compact(), &mut state, at(0)).await?;
    let second = update_document(&client, &first.document, key, UpdateMode::Soft, &compact(), &mut state, at(60)).await?;

    assert!(!second.changed());
    assert!(second.fetched());
    assert_eq!(second.outcomes[0].status, BlockStatus::Unchanged);
    assert_eq!(second.document, first.document);
    assert_eq!(
      state.throttle(&RefreshState::key(key, 0), 15).last_refresh(),
      Some(at(60))
    );
    Ok(())
  }

  #[tokio::test]
  async fn test_soft_update_respects_cooldown() -> Result<()> {
    let server = server(json!([issue_json(1, "One")])).await;
    let client = client(&server);
    let mut state = RefreshState::default();
    let key = Path::new("notes.md");

    update_document(&client, DOC, key, UpdateMode::Force, &compact(), &mut state, at(0)).await?;
    let report = update_document(&client, DOC, key, UpdateMode::Soft, &compact(), &mut state, at(5)).await?;

    assert_eq!(
      report.outcomes[0].status,
      BlockStatus::Throttled {
        remaining: TimeDelta::seconds(10)
      }
    );
    assert!(!report.fetched());
    assert_eq!(report.document, DOC);
    Ok(())
  }

  #[tokio::test]
  async fn test_soft_update_rewrites_changed_titles() -> Result<()> {
    let server = server(json!([issue_json(1, "One (renamed)"), issue_json(2, "Two")])).await;
    let doc = "```github-issues\nowner/repo #1,2\n```\n\
               <!-- github-issues:begin -->\n\
               - [#1 • \"One\"](https://github.com/owner/repo/issues/1)\n\
               - [#2 • \"Two\"](https://github.com/owner/repo/issues/2)\n\
               <!-- github-issues:end -->\n";
    let mut state = RefreshState::default();

    let report = update_document(
      &client(&server),
      doc,
      Path::new("notes.md"),
      UpdateMode::Soft,
      &compact(),
      &mut state,
      at(0),
    )
    .await?;

    assert!(report.changed());
    assert!(report.document.contains("\"One (renamed)\""));
    assert_eq!(report.document.matches(RENDER_BEGIN).count(), 1);
    Ok(())
  }

  #[tokio::test]
  async fn test_invalid_block_does_not_stop_others() -> Result<()> {
    let server = server(json!([issue_json(1, "One")])).await;
    let doc = "```github-issues\nnot-a-repo #1\n```\n\n```github-issues\nowner/repo #1\n```\n";
    let mut state = RefreshState::default();

    let report = update_document(
      &client(&server),
      doc,
      Path::new("notes.md"),
      UpdateMode::Force,
      &Settings::default(),
      &mut state,
      at(0),
    )
    .await?;

    assert!(matches!(report.outcomes[0].status, BlockStatus::Invalid(_)));
    assert_eq!(report.outcomes[1].status, BlockStatus::Rewritten { issues: 1 });
    assert_eq!(report.outcomes[1].repo, Some(RepoRef::new("owner", "repo")));
    assert!(report.document.contains("\topened on 2024-01-02 by [octocat](https://github.com/octocat)"));
    Ok(())
  }

  #[tokio::test]
  async fn test_blocks_have_independent_throttles() -> Result<()> {
    let server = server(json!([issue_json(1, "One"), issue_json(2, "Two")])).await;
    let client = client(&server);
    let doc = "```github-issues\nowner/repo #1\n```\n\n```github-issues\nowner/repo #2\n```\n";
    let key = Path::new("notes.md");

    let mut state = RefreshState::default();
    let mut throttle = state.throttle(&RefreshState::key(key, 0), 15);
    throttle.mark(at(0));
    state.record(&RefreshState::key(key, 0), &throttle);

    let report = update_document(&client, doc, key, UpdateMode::Soft, &compact(), &mut state, at(1)).await?;

    assert!(matches!(report.outcomes[0].status, BlockStatus::Throttled { .. }));
    assert_eq!(report.outcomes[1].status, BlockStatus::Rewritten { issues: 1 });
    Ok(())
  }

  #[tokio::test]
  async fn test_fetch_failure_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/issues"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&server)
      .await;
    let mut state = RefreshState::default();

    let err = update_document(
      &client(&server),
      DOC,
      Path::new("notes.md"),
      UpdateMode::Force,
      &Settings::default(),
      &mut state,
      at(0),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Failed to fetch issues for owner/repo"));
    assert!(state.is_empty());
  }
}
