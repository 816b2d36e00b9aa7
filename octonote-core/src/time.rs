//! Human readable ages for issues and comments.

use chrono::{DateTime, Utc};

/// How long ago `then` was, relative to `now`.
///
/// Anything a week or older is shown as an absolute date (`on 2024-01-31`).
/// Younger timestamps use the largest whole unit: `3 days ago`, `1 hour ago`.
/// Timestamps in the future count as `0 seconds ago`.
pub fn human_time_delta(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let delta = now.signed_duration_since(then);

  if delta.num_days() >= 7 {
    return format!("on {}", human_date(then));
  }

  let (amount, unit) = if delta.num_days() > 0 {
    (delta.num_days(), "day")
  } else if delta.num_hours() > 0 {
    (delta.num_hours(), "hour")
  } else if delta.num_minutes() > 0 {
    (delta.num_minutes(), "minute")
  } else {
    (delta.num_seconds().max(0), "second")
  };

  let plural = if amount == 1 { "" } else { "s" };
  format!("{amount} {unit}{plural} ago")
}

/// `YYYY-MM-DD`
pub fn human_date(date: DateTime<Utc>) -> String {
  date.format("%Y-%m-%d").to_string()
}
