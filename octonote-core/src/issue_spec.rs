//! # Issue Specification Parser
//!
//! Extracts issue numbers from free-form text such as `owner/repo #1,3-5`.
//! Only tight `#`-prefixed runs of comma and hyphen separated numbers are
//! recognized, so `#1, 3` yields just `1`. Only ASCII digits count: `#1٣`
//! yields `1`.
//!
//! Parsing never fails. Sub-tokens that cannot denote a valid issue number are
//! dropped and logged at debug level:
//! - numbers that overflow `u32`
//! - `0`, since issue numbers start at 1
//! - ranges with more than two bounds (`1-2-3`)
//! - ranges covering more than [`MAX_RANGE_SPAN`] numbers
//!
//! The last rule caps otherwise valid input. A range like `#1-4000000000` is
//! well formed, but expanding it would allocate billions of numbers, so it is
//! dropped like a malformed token.

use std::collections::HashSet;
use std::fmt;
use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Upper bound on how many numbers a single `start-end` token may expand to.
pub const MAX_RANGE_SPAN: u32 = 10_000;

static ISSUE_RUN_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"#[0-9]+(?:[,-][0-9]+)*").expect("Failed to compile issue spec regex"));

/// Ordered, duplicate-free list of issue numbers in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueNumbers(Vec<u32>);

impl IssueNumbers {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn contains(&self, number: u32) -> bool {
    self.0.contains(&number)
  }

  pub fn as_slice(&self) -> &[u32] {
    &self.0
  }

  pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
    self.0.iter().copied()
  }

  /// Format the numbers back into a compact `#a,b-c` specification.
  ///
  /// Consecutive ascending runs of three or more collapse into a range.
  /// Returns an empty string when there are no numbers.
  pub fn to_spec_string(&self) -> String {
    if self.0.is_empty() {
      return String::new();
    }

    let mut parts = Vec::new();
    let mut i = 0;
    while i < self.0.len() {
      let start = self.0[i];
      let mut j = i;
      while j + 1 < self.0.len() && self.0[j + 1] == self.0[j] + 1 {
        j += 1;
      }
      match j - i {
        0 => parts.push(start.to_string()),
        1 => {
          parts.push(start.to_string());
          parts.push(self.0[j].to_string());
        }
        _ => parts.push(format!("{}-{}", start, self.0[j])),
      }
      i = j + 1;
    }

    format!("#{}", parts.join(","))
  }
}

impl fmt::Display for IssueNumbers {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = self.0.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    write!(f, "[{joined}]")
  }
}

impl IntoIterator for IssueNumbers {
  type Item = u32;
  type IntoIter = std::vec::IntoIter<u32>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl From<IssueNumbers> for Vec<u32> {
  fn from(numbers: IssueNumbers) -> Self {
    numbers.0
  }
}

/// Why a sub-token was dropped
#[derive(Debug, Error, PartialEq, Eq)]
enum TokenError {
  #[error("'{0}' does not fit in an issue number")]
  Overflow(String),
  #[error("'{0}' is not a number")]
  NotANumber(String),
  #[error("issue numbers start at 1")]
  Zero,
  #[error("'{0}' has more than two range bounds")]
  TooManyBounds(String),
  #[error("range {0}-{1} exceeds the range size limit")]
  SpanTooLarge(u32, u32),
}

enum Token {
  Single(u32),
  Range(u32, u32),
}

/// Accumulates numbers while rejecting duplicates
#[derive(Default)]
struct Collector {
  ordered: Vec<u32>,
  seen: HashSet<u32>,
}

impl Collector {
  fn push(&mut self, number: u32) {
    if number != 0 && self.seen.insert(number) {
      self.ordered.push(number);
    }
  }
}

fn parse_number(raw: &str) -> Result<u32, TokenError> {
  raw.parse::<u32>().map_err(|e| match e.kind() {
    IntErrorKind::PosOverflow => TokenError::Overflow(raw.to_string()),
    _ => TokenError::NotANumber(raw.to_string()),
  })
}

fn parse_token(raw: &str) -> Result<Token, TokenError> {
  if !raw.contains('-') {
    return match parse_number(raw)? {
      0 => Err(TokenError::Zero),
      n => Ok(Token::Single(n)),
    };
  }

  let bounds: Vec<&str> = raw.split('-').collect();
  let [start, end] = bounds.as_slice() else {
    return Err(TokenError::TooManyBounds(raw.to_string()));
  };
  let start = parse_number(start)?;
  let end = parse_number(end)?;

  if end >= start && end - start >= MAX_RANGE_SPAN {
    return Err(TokenError::SpanTooLarge(start, end));
  }

  Ok(Token::Range(start, end))
}

/// Parse every issue number referenced by `#N`, `#N,M` and `#N-M` runs in
/// `input`.
///
/// Numbers are deduplicated across all runs and kept in the order they were
/// first seen. A reversed range such as `#8-5` contributes nothing.
pub fn parse_issue_spec(input: &str) -> IssueNumbers {
  let mut collector = Collector::default();

  for run in ISSUE_RUN_REGEX.find_iter(input) {
    let body = run.as_str().trim_start_matches('#');

    for raw in body.split(',') {
      match parse_token(raw) {
        Ok(Token::Single(number)) => collector.push(number),
        Ok(Token::Range(start, end)) => {
          for number in start..=end {
            collector.push(number);
          }
        }
        Err(e) => debug!("Dropping issue token '{}': {}", raw, e),
      }
    }
  }

  IssueNumbers(collector.ordered)
}
