//! Constants for the octonote-gh client

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!("octonote/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// Header pinning the REST API version
pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// REST API version the client is written against
pub const API_VERSION: &str = "2022-11-28";

/// Page size requested from list endpoints (the API maximum)
pub const PER_PAGE: usize = 100;

/// Upper bound on pages fetched by a single list call
pub const MAX_PAGES: u32 = 50;
