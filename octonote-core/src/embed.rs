//! # Embed Blocks
//!
//! Locates, creates and rewrites the fenced `github-issues` blocks that record
//! which repository (and optionally which issues) a note embeds. Below each
//! block the rendered issue list is materialized between HTML comment markers
//! so that any Markdown viewer shows it:
//!
//! ````markdown
//! ```github-issues
//! octocat/hello-world #1,3-5
//! ```
//! <!-- github-issues:begin -->
//! - [#1 • "Found a bug"](https://github.com/octocat/hello-world/issues/1)
//! <!-- github-issues:end -->
//! ````
//!
//! Line numbers in this module are zero-based unless stated otherwise.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Appearance;
use crate::issue_spec::{IssueNumbers, parse_issue_spec};
use crate::repo::{GITHUB_WEB_URL, RepoRef, RepoRefError, RepoTarget};

/// Info string of the fenced code block
pub const FENCE_OPEN: &str = "```github-issues";
pub const FENCE_CLOSE: &str = "```";
pub const RENDER_BEGIN: &str = "<!-- github-issues:begin -->";
pub const RENDER_END: &str = "<!-- github-issues:end -->";

static RENDERED_ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"^\s*-\s+\[#(\d+) • "(.*)"\]\("#).expect("Failed to compile rendered issue regex")
});

/// Errors raised while interpreting or editing embed blocks
#[derive(Debug, Error)]
pub enum EmbedError {
  #[error("Embed block on line {line} has no repository line")]
  EmptyBlock { line: usize },
  #[error("Embed block on line {line} names an invalid repository: {source}")]
  InvalidRepo {
    line: usize,
    #[source]
    source: RepoRefError,
  },
  #[error("Line {line} is past the end of the document ({len} lines)")]
  LineOutOfRange { line: usize, len: usize },
}

/// The minimum an issue must expose to be written into a note
pub trait EmbeddableIssue {
  fn number(&self) -> u32;
  fn title(&self) -> &str;
  fn author(&self) -> &str;
  fn created_at(&self) -> DateTime<Utc>;
  fn html_url(&self) -> &str;
}

/// What an embed block asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSpec {
  pub repo: RepoRef,
  /// Requested issues. Empty means every open issue.
  pub issues: IssueNumbers,
}

impl EmbedSpec {
  /// Parse a repository line such as `owner/repo #1,4-6`.
  ///
  /// The repository is the first token before any `#`. It may be given as
  /// `owner/name` or as a URL.
  pub fn parse(line: &str) -> Result<Self, RepoRefError> {
    let head = line.split('#').next().unwrap_or_default();
    let token = head.split_whitespace().next().unwrap_or_default();

    let repo = token.parse::<RepoTarget>()?.repo_ref()?;
    let issues = parse_issue_spec(line);

    Ok(Self { repo, issues })
  }

  /// The line stored inside the block
  pub fn to_line(&self) -> String {
    if self.issues.is_empty() {
      self.repo.to_string()
    } else {
      format!("{} {}", self.repo, self.issues.to_spec_string())
    }
  }
}

/// Line span of a materialized issue list, markers included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedRange {
  pub begin_line: usize,
  pub end_line: usize,
}

/// An embed block found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedBlock {
  /// Position among the blocks of the same document
  pub index: usize,
  pub open_line: usize,
  pub close_line: usize,
  /// Lines between the fences
  pub body: Vec<String>,
  pub rendered: Option<RenderedRange>,
}

impl EmbedBlock {
  /// Interpret the first non-empty line of the block
  pub fn spec(&self) -> Result<EmbedSpec, EmbedError> {
    let line = self
      .body
      .iter()
      .find(|line| !line.trim().is_empty())
      .ok_or(EmbedError::EmptyBlock {
        line: self.open_line + 1,
      })?;

    EmbedSpec::parse(line).map_err(|source| EmbedError::InvalidRepo {
      line: self.open_line + 1,
      source,
    })
  }

  /// Last line that belongs to this block, including its rendered list
  pub fn last_line(&self) -> usize {
    self.rendered.map_or(self.close_line, |r| r.end_line)
  }
}

/// The fence may carry extra info after the language, e.g. `title="Bugs"`.
fn is_open_fence(line: &str) -> bool {
  line
    .trim_start()
    .strip_prefix(FENCE_OPEN)
    .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn find_rendered(lines: &[&str], begin: usize) -> Option<RenderedRange> {
  if lines.get(begin).map(|l| l.trim()) != Some(RENDER_BEGIN) {
    return None;
  }

  match (begin + 1..lines.len()).find(|&i| lines[i].trim() == RENDER_END) {
    Some(end_line) => Some(RenderedRange {
      begin_line: begin,
      end_line,
    }),
    None => {
      warn!("Rendered issue list on line {} has no end marker", begin + 1);
      None
    }
  }
}

/// Find every embed block in `doc`, in document order.
///
/// A block without a closing fence ends the scan.
pub fn locate_blocks(doc: &str) -> Vec<EmbedBlock> {
  let lines: Vec<&str> = doc.lines().collect();
  let mut blocks = Vec::new();
  let mut i = 0;

  while i < lines.len() {
    if !is_open_fence(lines[i]) {
      i += 1;
      continue;
    }

    let Some(close_line) = (i + 1..lines.len()).find(|&j| lines[j].trim() == FENCE_CLOSE) else {
      warn!("Embed block on line {} is never closed", i + 1);
      break;
    };

    let block = EmbedBlock {
      index: blocks.len(),
      open_line: i,
      close_line,
      body: lines[i + 1..close_line].iter().map(|l| l.to_string()).collect(),
      rendered: find_rendered(&lines, close_line + 1),
    };
    debug!(
      "Found embed block {} on lines {}-{}",
      block.index,
      block.open_line + 1,
      block.last_line() + 1
    );

    i = block.last_line() + 1;
    blocks.push(block);
  }

  blocks
}

/// Text of a new embed block, ending with a newline
pub fn embed_snippet(repo: &RepoRef, issues: &IssueNumbers) -> String {
  let spec = EmbedSpec {
    repo: repo.clone(),
    issues: issues.clone(),
  };
  format!("{FENCE_OPEN}\n{}\n{FENCE_CLOSE}\n", spec.to_line())
}

/// Insert `snippet` before the one-based `line`, or append it when `line` is
/// `None`.
pub fn insert_embed(doc: &str, line: Option<usize>, snippet: &str) -> Result<String, EmbedError> {
  let lines: Vec<&str> = doc.lines().collect();

  let Some(line) = line else {
    let mut out = doc.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
      out.push('\n');
    }
    out.push_str(snippet);
    return Ok(out);
  };

  if line == 0 || line > lines.len() + 1 {
    return Err(EmbedError::LineOutOfRange { line, len: lines.len() });
  }

  let mut out = String::with_capacity(doc.len() + snippet.len());
  for l in &lines[..line - 1] {
    out.push_str(l);
    out.push('\n');
  }
  out.push_str(snippet);
  for l in &lines[line - 1..] {
    out.push_str(l);
    out.push('\n');
  }
  if !doc.ends_with('\n') && line <= lines.len() {
    out.pop();
  }

  Ok(out)
}

// Square brackets would terminate the link text early
fn escape_title(title: &str) -> String {
  title.replace('[', "\\[").replace(']', "\\]")
}

fn unescape_title(title: &str) -> String {
  title.replace("\\[", "[").replace("\\]", "]")
}

/// Markdown list for the given issues, one entry per issue.
pub fn render_markdown<I: EmbeddableIssue>(issues: &[I], appearance: Appearance) -> String {
  let mut out = String::new();

  for issue in issues {
    out.push_str(&format!(
      "- [#{} • \"{}\"]({})\n",
      issue.number(),
      escape_title(issue.title()),
      issue.html_url()
    ));

    if appearance == Appearance::Default {
      out.push_str(&format!(
        "\topened on {} by [{author}]({GITHUB_WEB_URL}/{author})\n",
        issue.created_at().format("%Y-%m-%d"),
        author = issue.author()
      ));
    }
  }

  out
}

/// Replace the materialized list of `block`, or add one right after its
/// closing fence.
///
/// `block` must have been located in `doc`. When several blocks are updated,
/// work from the last one backwards so earlier line numbers stay valid.
pub fn replace_rendered(doc: &str, block: &EmbedBlock, rendered: &str) -> String {
  let lines: Vec<&str> = doc.lines().collect();
  let (keep_until, resume_at) = match block.rendered {
    Some(range) => (range.begin_line, range.end_line + 1),
    None => (block.close_line + 1, block.close_line + 1),
  };
  let resume_at = resume_at.min(lines.len());

  let mut out = String::with_capacity(doc.len() + rendered.len());
  for l in &lines[..keep_until.min(lines.len())] {
    out.push_str(l);
    out.push('\n');
  }

  out.push_str(RENDER_BEGIN);
  out.push('\n');
  out.push_str(rendered);
  if !rendered.is_empty() && !rendered.ends_with('\n') {
    out.push('\n');
  }
  out.push_str(RENDER_END);
  out.push('\n');

  let tail = &lines[resume_at..];
  for l in tail {
    out.push_str(l);
    out.push('\n');
  }
  if !tail.is_empty() && !doc.ends_with('\n') {
    out.pop();
  }

  out
}

/// Issue numbers and titles currently materialized under `block`
pub fn rendered_issues(doc: &str, block: &EmbedBlock) -> Vec<(u32, String)> {
  let Some(range) = block.rendered else {
    return Vec::new();
  };

  doc
    .lines()
    .skip(range.begin_line + 1)
    .take(range.end_line.saturating_sub(range.begin_line + 1))
    .filter_map(|line| RENDERED_ITEM_REGEX.captures(line))
    .filter_map(|caps| {
      let number = caps[1].parse::<u32>().ok()?;
      Some((number, unescape_title(&caps[2])))
    })
    .collect()
}
