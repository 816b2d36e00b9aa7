use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::home::HomeEnvTestGuard;

/// RAII guard for test .netrc files
///
/// Creates a temporary HOME holding a `.netrc` with the given content and
/// restores the original HOME when dropped.
pub struct NetrcGuard {
  home: HomeEnvTestGuard,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let home = HomeEnvTestGuard::new();
    let netrc_path = home.home_path(".netrc");
    write_private(&netrc_path, content).expect("Failed to write test .netrc");

    Self { home, netrc_path }
  }

  /// Guard holding a `.netrc` with a `github.com` entry
  pub fn github(username: &str, token: &str) -> Self {
    Self::new(&format!("machine github.com\n  login {username}\n  password {token}\n"))
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary directory
  pub fn home_dir(&self) -> &Path {
    self.home.home_dir()
  }

  /// Whether `directories` resolves HOME to this guard's directory
  pub fn is_active(&self) -> bool {
    BaseDirs::new().is_some_and(|dirs| dirs.home_dir() == self.home_dir())
  }
}

fn write_private(path: &Path, content: &str) -> Result<()> {
  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).context("Failed to restrict .netrc permissions")?;
  }

  Ok(())
}
