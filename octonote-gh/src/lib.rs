//! # GitHub API Client
//!
//! Provides GitHub REST API integration for issues, comments, labels,
//! repositories and user data, including credential-backed client
//! construction for the octonote CLI.

pub mod auth;
pub mod client;
pub mod consts;
pub mod endpoints;
pub mod models;

// Re-export the client
pub use auth::{create_github_client_from_netrc, create_github_runtime_and_client};
pub use client::{GitHubClient, create_github_client};
// Re-export models
pub use models::{
  GitHubAuth, GitHubComment, GitHubIssue, GitHubLabel, GitHubRepository, GitHubUser, IssueState, IssueUpdate, NewIssue,
};
