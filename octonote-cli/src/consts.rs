//! Constants for the octonote CLI

/// Reported when a soft update finds the materialized lists current
pub const NO_UPDATES_MESSAGE: &str = "No issue updates found";

/// Where personal access tokens are created
pub const GITHUB_TOKEN_URL: &str = "https://github.com/settings/tokens";

/// Token scopes the CLI needs
pub const GITHUB_TOKEN_SCOPES: &str = "repo, read:user";
