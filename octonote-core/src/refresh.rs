//! # Refresh Throttling
//!
//! Soft updates are rate limited per embed block. The throttle is a plain
//! value owned by whoever drives the refresh, and [`RefreshState`] persists one
//! timestamp per block between CLI invocations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Cooldown gate for a single embed block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshThrottle {
  cooldown: TimeDelta,
  last_refresh: Option<DateTime<Utc>>,
}

impl RefreshThrottle {
  pub fn new(cooldown: TimeDelta) -> Self {
    Self {
      cooldown,
      last_refresh: None,
    }
  }

  pub fn from_secs(cooldown_secs: u64) -> Self {
    let secs = cooldown_secs.min(u64::from(u32::MAX));
    Self::new(TimeDelta::seconds(secs as i64))
  }

  pub fn with_last_refresh(mut self, last_refresh: Option<DateTime<Utc>>) -> Self {
    self.last_refresh = last_refresh;
    self
  }

  pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
    self.last_refresh
  }

  /// Whether enough time has passed since the last refresh.
  ///
  /// A last refresh in the future (clock skew) keeps the throttle closed.
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.remaining(now).is_none()
  }

  /// Time left until the throttle opens, if it is still closed
  pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
    let last = self.last_refresh?;
    let elapsed = now.signed_duration_since(last);
    (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
  }

  /// Record a refresh at `now`
  pub fn mark(&mut self, now: DateTime<Utc>) {
    self.last_refresh = Some(now);
  }
}

/// Last refresh time of every embed block the CLI has updated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshState {
  #[serde(default)]
  entries: BTreeMap<String, DateTime<Utc>>,
}

impl RefreshState {
  /// Key identifying one block of one document
  pub fn key(document: &Path, block_index: usize) -> String {
    format!("{}#{block_index}", document.display())
  }

  /// Load state from `path`, or start empty when it does not exist
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read refresh state from {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse refresh state from {}", path.display()))
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(self).context("Failed to serialize refresh state")?;
    fs::write(path, content).with_context(|| format!("Failed to write refresh state to {}", path.display()))
  }

  /// Throttle for the block stored under `key`
  pub fn throttle(&self, key: &str, cooldown_secs: u64) -> RefreshThrottle {
    RefreshThrottle::from_secs(cooldown_secs).with_last_refresh(self.entries.get(key).copied())
  }

  /// Store the throttle's last refresh time under `key`
  pub fn record(&mut self, key: &str, throttle: &RefreshThrottle) {
    if let Some(last) = throttle.last_refresh() {
      trace!("Recording refresh of {} at {}", key, last);
      self.entries.insert(key.to_string(), last);
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
