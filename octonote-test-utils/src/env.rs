//! Environment variable management for testing
//!
//! This module provides utilities for managing XDG and other environment
//! variables during testing to ensure tests don't interfere with each other.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

static XDG_LOCK: Mutex<()> = Mutex::new(());
static VAR_LOCK: Mutex<()> = Mutex::new(());
pub(crate) static HOME_LOCK: Mutex<()> = Mutex::new(());

/// Take one of the environment locks, ignoring poisoning from a failed test
pub(crate) fn acquire(lock: &'static Mutex<()>) -> MutexGuard<'static, ()> {
  lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restore `key` to `original`, removing it if it was unset
pub(crate) fn restore_var(key: &str, original: Option<&OsString>) {
  match original {
    Some(val) => unsafe {
      env::set_var(key, val);
    },
    None => unsafe {
      env::remove_var(key);
    },
  }
}

/// A test environment that overrides XDG directories to use a per-test
/// temporary directory
pub struct EnvTestGuard {
  /// The temporary directory that will be used for XDG directories
  pub temp_dir: TempDir,
  /// The original XDG_CONFIG_HOME value, if any
  original_config_home: Option<OsString>,
  /// The original XDG_DATA_HOME value, if any
  original_data_home: Option<OsString>,
  /// The original XDG_CACHE_HOME value, if any
  original_cache_home: Option<OsString>,
  _lock: MutexGuard<'static, ()>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  /// XDG environment variable names
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const XDG_DATA_HOME: &'static str = "XDG_DATA_HOME";
  pub const XDG_CACHE_HOME: &'static str = "XDG_CACHE_HOME";

  /// Create a new test environment with overridden XDG directories
  pub fn new() -> Self {
    let lock = acquire(&XDG_LOCK);
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let original_config_home = env::var_os(Self::XDG_CONFIG_HOME);
    let original_data_home = env::var_os(Self::XDG_DATA_HOME);
    let original_cache_home = env::var_os(Self::XDG_CACHE_HOME);

    let temp_path = temp_dir.path().to_path_buf();
    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, temp_path.join("config"));
      env::set_var(Self::XDG_DATA_HOME, temp_path.join("data"));
      env::set_var(Self::XDG_CACHE_HOME, temp_path.join("cache"));
    }

    std::fs::create_dir_all(temp_path.join("config")).expect("Failed to create config directory");
    std::fs::create_dir_all(temp_path.join("data")).expect("Failed to create data directory");
    std::fs::create_dir_all(temp_path.join("cache")).expect("Failed to create cache directory");

    Self {
      temp_dir,
      original_config_home,
      original_data_home,
      original_cache_home,
      _lock: lock,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  /// Get the path to the XDG data directory
  pub fn data_dir(&self) -> PathBuf {
    self.temp_dir.path().join("data")
  }

  /// Get the path to the XDG cache directory
  pub fn cache_dir(&self) -> PathBuf {
    self.temp_dir.path().join("cache")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    restore_var(Self::XDG_CONFIG_HOME, self.original_config_home.as_ref());
    restore_var(Self::XDG_DATA_HOME, self.original_data_home.as_ref());
    restore_var(Self::XDG_CACHE_HOME, self.original_cache_home.as_ref());
  }
}

/// Sets (or clears) a single environment variable until dropped
pub struct EnvVarGuard {
  key: String,
  original: Option<OsString>,
  _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
  pub fn set(key: &str, value: &str) -> Self {
    let guard = Self::capture(key);
    unsafe {
      env::set_var(key, value);
    }
    guard
  }

  pub fn unset(key: &str) -> Self {
    let guard = Self::capture(key);
    unsafe {
      env::remove_var(key);
    }
    guard
  }

  fn capture(key: &str) -> Self {
    let lock = acquire(&VAR_LOCK);
    Self {
      key: key.to_string(),
      original: env::var_os(key),
      _lock: lock,
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    restore_var(&self.key, self.original.as_ref());
  }
}
