//! # Octonote Core Library
//!
//! Core library for octonote providing the issue spec parser, the embed block
//! document model, configuration, credentials, and terminal output helpers.
//! Network access lives in `octonote-gh`; this crate never talks to GitHub.

pub mod config;
pub mod creds;
pub mod embed;
pub mod issue_spec;
pub mod output;
pub mod refresh;
pub mod repo;
pub mod time;

// Re-export main types
pub use config::{Appearance, ConfigDirs, Settings, get_config_dirs};
pub use creds::{Credentials, get_github_credentials};
pub use embed::{EmbedBlock, EmbedError, EmbedSpec, EmbeddableIssue, locate_blocks};
pub use issue_spec::{IssueNumbers, parse_issue_spec};
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
pub use refresh::{RefreshState, RefreshThrottle};
pub use repo::{RepoRef, RepoRefError, RepoTarget};
