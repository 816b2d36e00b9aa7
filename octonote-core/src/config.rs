//! # Configuration Management
//!
//! Handles application configuration, directory management, and user settings
//! for octonote, including XDG base directory support.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured GitHub API base URL
pub const ENV_GITHUB_API_URL: &str = "OCTONOTE_GITHUB_API_URL";

/// Base URL for the official SaaS GitHub API
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default minimum age of an embed before a soft update fetches it again
pub const DEFAULT_REFRESH_COOLDOWN_SECS: u64 = 15;

/// How issues are laid out when written into a note or printed
#[derive(clap::ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
  /// Title, labels, and an "opened by" line
  #[default]
  Default,
  /// One line per issue
  Compact,
}

impl std::fmt::Display for Appearance {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Appearance::Default => write!(f, "default"),
      Appearance::Compact => write!(f, "compact"),
    }
  }
}

/// User settings stored in `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub appearance: Appearance,
  pub api_base_url: String,
  pub refresh_cooldown_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      appearance: Appearance::Default,
      api_base_url: DEFAULT_API_BASE_URL.to_string(),
      refresh_cooldown_secs: DEFAULT_REFRESH_COOLDOWN_SECS,
    }
  }
}

impl Settings {
  /// Keys accepted by [`Settings::set`]
  pub const KEYS: [&'static str; 3] = ["appearance", "api_base_url", "refresh_cooldown_secs"];

  /// API base URL, honoring the environment override
  pub fn api_base_url(&self) -> String {
    std::env::var(ENV_GITHUB_API_URL)
      .ok()
      .filter(|url| !url.trim().is_empty())
      .unwrap_or_else(|| self.api_base_url.clone())
      .trim_end_matches('/')
      .to_string()
  }

  /// Update one setting from its string form
  pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
    match key {
      "appearance" => {
        self.appearance = <Appearance as clap::ValueEnum>::from_str(value, true)
          .map_err(|e| anyhow::anyhow!("Invalid appearance '{value}': {e}"))?;
      }
      "api_base_url" => {
        url::Url::parse(value).with_context(|| format!("Invalid API base URL '{value}'"))?;
        self.api_base_url = value.trim_end_matches('/').to_string();
      }
      "refresh_cooldown_secs" => {
        self.refresh_cooldown_secs = value
          .parse()
          .with_context(|| format!("Invalid cooldown '{value}', expected whole seconds"))?;
      }
      _ => {
        return Err(anyhow::anyhow!(
          "Unknown setting '{key}'. Valid keys: {}",
          Self::KEYS.join(", ")
        ));
      }
    }
    Ok(())
  }
}

/// Represents the configuration directories for the octonote application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: Option<PathBuf>,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs =
      ProjectDirs::from("dev", "octonote", "octonote").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
      cache_dir: Some(proj_dirs.cache_dir().to_path_buf()),
    })
  }

  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  pub fn data_dir(&self) -> &PathBuf {
    &self.data_dir
  }

  pub fn cache_dir(&self) -> Option<&PathBuf> {
    self.cache_dir.as_ref()
  }

  /// Initialize the configuration directories
  pub fn init(&self) -> Result<()> {
    fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;
    fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
    if let Some(cache_dir) = &self.cache_dir {
      fs::create_dir_all(cache_dir).context("Failed to create cache directory")?;
    }
    Ok(())
  }

  /// Get the path to the settings file
  pub fn settings_path(&self) -> PathBuf {
    self.config_dir.join("config.toml")
  }

  /// Get the path to the per-embed refresh timestamps
  pub fn refresh_state_path(&self) -> PathBuf {
    self.data_dir.join("refresh.json")
  }

  /// Load settings from file or return defaults
  pub fn load_settings(&self) -> Result<Settings> {
    load_settings_from(&self.settings_path())
  }

  /// Save settings to file
  pub fn save_settings(&self, settings: &Settings) -> Result<()> {
    let path = self.settings_path();

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")?;
    fs::write(&path, content).with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
  }
}

fn load_settings_from(path: &Path) -> Result<Settings> {
  if !path.exists() {
    return Ok(Settings::default());
  }

  let content = fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path.display()))?;
  toml::from_str(&content).with_context(|| format!("Failed to parse settings from {}", path.display()))
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

#[cfg(test)]
mod tests {
  use octonote_test_utils::{EnvTestGuard, EnvVarGuard};
  use tempfile::TempDir;

  use super::*;

  fn dirs_in(temp: &TempDir) -> ConfigDirs {
    ConfigDirs {
      config_dir: temp.path().join("config"),
      data_dir: temp.path().join("data"),
      cache_dir: None,
    }
  }

  #[test]
  fn test_missing_settings_fall_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let settings = dirs_in(&temp).load_settings().unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.refresh_cooldown_secs, 15);
  }

  #[test]
  fn test_settings_round_trip() {
    let temp = TempDir::new().unwrap();
    let dirs = dirs_in(&temp);

    let settings = Settings {
      appearance: Appearance::Compact,
      api_base_url: "https://ghe.example.com/api/v3".to_string(),
      refresh_cooldown_secs: 60,
    };
    dirs.save_settings(&settings).unwrap();

    let raw = fs::read_to_string(dirs.settings_path()).unwrap();
    assert!(raw.contains("appearance = \"compact\""));
    assert_eq!(dirs.load_settings().unwrap(), settings);
  }

  #[test]
  fn test_partial_settings_file() {
    let temp = TempDir::new().unwrap();
    let dirs = dirs_in(&temp);
    fs::create_dir_all(dirs.config_dir()).unwrap();
    fs::write(dirs.settings_path(), "appearance = \"compact\"\n").unwrap();

    let settings = dirs.load_settings().unwrap();
    assert_eq!(settings.appearance, Appearance::Compact);
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
  }

  #[test]
  fn test_invalid_settings_file() {
    let temp = TempDir::new().unwrap();
    let dirs = dirs_in(&temp);
    fs::create_dir_all(dirs.config_dir()).unwrap();
    fs::write(dirs.settings_path(), "appearance = \"fancy\"\n").unwrap();

    let err = dirs.load_settings().unwrap_err();
    assert!(err.to_string().contains("Failed to parse settings"));
  }

  #[test]
  fn test_settings_set() {
    let mut settings = Settings::default();
    settings.set("appearance", "Compact").unwrap();
    assert_eq!(settings.appearance, Appearance::Compact);

    settings.set("api_base_url", "https://ghe.example.com/api/v3/").unwrap();
    assert_eq!(settings.api_base_url, "https://ghe.example.com/api/v3");

    settings.set("refresh_cooldown_secs", "30").unwrap();
    assert_eq!(settings.refresh_cooldown_secs, 30);

    assert!(settings.set("refresh_cooldown_secs", "soon").is_err());
    assert!(settings.set("api_base_url", "not a url").is_err());
    let err = settings.set("color", "red").unwrap_err();
    assert!(err.to_string().contains("Unknown setting 'color'"));
  }

  #[test]
  fn test_api_base_url_env_override() {
    let settings = Settings::default();

    let _guard = EnvVarGuard::set(ENV_GITHUB_API_URL, "http://127.0.0.1:9999/");
    assert_eq!(settings.api_base_url(), "http://127.0.0.1:9999");
  }

  #[test]
  fn test_config_dirs_follow_xdg() {
    let env = EnvTestGuard::new();
    let dirs = ConfigDirs::new().unwrap();
    dirs.init().unwrap();

    if cfg!(target_os = "linux") {
      assert!(dirs.config_dir().starts_with(env.config_dir()));
      assert!(dirs.data_dir().starts_with(env.data_dir()));
    }
    assert!(dirs.config_dir().exists());
    assert!(dirs.data_dir().exists());
    assert_eq!(dirs.settings_path().file_name().unwrap(), "config.toml");
    assert_eq!(dirs.refresh_state_path().file_name().unwrap(), "refresh.json");
  }
}
