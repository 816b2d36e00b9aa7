//! # Credential Management
//!
//! GitHub credentials live in the user's `.netrc` file under the
//! `github.com` machine entry, with the personal access token stored as the
//! password. This keeps them compatible with git and other tools.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use tracing::debug;

/// Machine name GitHub credentials are stored under
pub const GITHUB_MACHINE: &str = "github.com";

/// Represents credentials for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// The current user's home directory
pub fn home_dir() -> Result<PathBuf> {
  BaseDirs::new()
    .map(|dirs| dirs.home_dir().to_path_buf())
    .context("Failed to determine home directory")
}

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// ```
/// use std::path::Path;
/// use octonote_core::creds::get_netrc_path;
///
/// assert_eq!(get_netrc_path(Path::new("/home/user")), Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Find the credentials for `target_machine` in netrc `content`.
///
/// Tokens may be spread over any number of lines. Entries missing either a
/// login or a password are treated as absent.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut in_target = false;
  let mut username = None;
  let mut password = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if in_target {
          break;
        }
        in_target = tokens.next() == Some(target_machine);
      }
      "default" => {
        if in_target {
          break;
        }
      }
      "login" if in_target => username = tokens.next(),
      "password" if in_target => password = tokens.next(),
      "login" | "password" | "account" => {
        tokens.next();
      }
      _ => {}
    }
  }

  Some(Credentials {
    username: username?.to_string(),
    password: password?.to_string(),
  })
}

/// Read the credentials for `target_machine` from the netrc file at `path`.
///
/// A missing file yields `Ok(None)`.
pub fn read_netrc_credentials(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  if !path.exists() {
    debug!("No .netrc file at {}", path.display());
    return Ok(None);
  }

  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(parse_netrc(&content, target_machine))
}

/// Credentials stored for GitHub under the given home directory
pub fn get_github_credentials(home: &Path) -> Result<Option<Credentials>> {
  read_netrc_credentials(&get_netrc_path(home), GITHUB_MACHINE)
}

/// Remove the entry for `machine` from netrc `content`, keeping everything
/// else untouched
fn remove_machine(content: &str, machine: &str) -> String {
  let mut kept = String::new();
  let mut skipping = false;

  for line in content.lines() {
    let mut words = line.split_whitespace();
    match words.next() {
      Some("machine") => skipping = words.next() == Some(machine),
      Some("default") => skipping = false,
      _ => {}
    }

    if !skipping {
      kept.push_str(line);
      kept.push('\n');
    }
  }

  kept
}

/// Write or replace the `.netrc` entry for `machine`.
///
/// On unix the file is restricted to mode `600`.
pub fn write_netrc_entry(path: &Path, machine: &str, username: &str, password: &str) -> Result<()> {
  let existing = if path.exists() {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
  } else {
    String::new()
  };

  let mut content = remove_machine(&existing, machine);
  if !content.is_empty() && !content.ends_with("\n\n") {
    content.push('\n');
  }
  content.push_str(&format!("machine {machine}\n  login {username}\n  password {password}\n"));

  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  set_secure_permissions(path)
}

#[cfg(unix)]
fn set_secure_permissions(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(0o600))
    .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_secure_permissions(_path: &Path) -> Result<()> {
  Ok(())
}

/// Whether group or others can read the file at `path`
#[cfg(unix)]
pub fn has_insecure_permissions(path: &Path) -> Result<bool> {
  use std::os::unix::fs::PermissionsExt;

  let mode = fs::metadata(path)
    .with_context(|| format!("Failed to read metadata of {}", path.display()))?
    .permissions()
    .mode();
  Ok(mode & 0o077 != 0)
}

#[cfg(not(unix))]
pub fn has_insecure_permissions(_path: &Path) -> Result<bool> {
  Ok(false)
}

#[cfg(test)]
mod tests {
  use octonote_test_utils::NetrcGuard;
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_multi_line_entries() {
    let content = "machine example.com\n  login other\n  password secret\n\n\
                   machine github.com\n  login octocat\n  password ghp_token\n";
    assert_eq!(
      parse_netrc(content, "github.com"),
      Some(Credentials {
        username: "octocat".to_string(),
        password: "ghp_token".to_string(),
      })
    );
    assert_eq!(parse_netrc(content, "example.com").unwrap().username, "other");
  }

  #[test]
  fn test_parse_single_line_entry() {
    let content = "machine github.com login octocat password ghp_token";
    assert_eq!(parse_netrc(content, "github.com").unwrap().password, "ghp_token");
  }

  #[test]
  fn test_parse_incomplete_or_missing() {
    assert_eq!(parse_netrc("machine github.com\n  login octocat\n", "github.com"), None);
    assert_eq!(parse_netrc("machine gitlab.com login a password b", "github.com"), None);
    assert_eq!(parse_netrc("", "github.com"), None);
  }

  #[test]
  fn test_parse_does_not_leak_between_machines() {
    let content = "machine github.com login octocat\nmachine example.com login x password y\n";
    assert_eq!(parse_netrc(content, "github.com"), None);
  }

  #[test]
  fn test_get_github_credentials() {
    let guard = NetrcGuard::new("machine github.com\n  login testuser\n  password gh-token\n");
    let creds = get_github_credentials(guard.home_dir()).unwrap().unwrap();
    assert_eq!(creds.username, "testuser");
    assert_eq!(creds.password, "gh-token");
  }

  #[test]
  fn test_missing_netrc_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    assert_eq!(get_github_credentials(temp.path()).unwrap(), None);
  }

  #[test]
  fn test_write_new_entry() {
    let temp = TempDir::new().unwrap();
    let path = get_netrc_path(temp.path());

    write_netrc_entry(&path, "github.com", "octocat", "token1").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "machine github.com\n  login octocat\n  password token1\n");
    assert!(!has_insecure_permissions(&path).unwrap());
  }

  #[test]
  fn test_write_replaces_existing_entry() {
    let temp = TempDir::new().unwrap();
    let path = get_netrc_path(temp.path());
    fs::write(
      &path,
      "machine github.com\n  login old\n  password old-token\n\nmachine example.com\n  login keep\n  password me\n",
    )
    .unwrap();

    write_netrc_entry(&path, "github.com", "octocat", "new-token").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("old-token"));
    assert_eq!(parse_netrc(&content, "github.com").unwrap().password, "new-token");
    assert_eq!(parse_netrc(&content, "example.com").unwrap().username, "keep");
  }
}
