//! # GitHub API Endpoints
//!
//! Organized endpoint implementations for different GitHub API resource types,
//! including issues, comments, labels, repositories and users.

pub mod comments;
pub mod issues;
pub mod labels;
pub mod repos;
pub mod users;
