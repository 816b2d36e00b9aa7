use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use tracing::instrument;

use crate::client::{GitHubClient, decode_response};
use crate::models::GitHubUser;

impl GitHubClient {
  /// Get the current authenticated user
  #[instrument(skip(self), level = "debug")]
  pub async fn get_current_user(&self) -> Result<GitHubUser> {
    let url = format!("{}/user", self.base_url);

    let response = self
      .request(Method::GET, &url)
      .send()
      .await
      .context("Failed to fetch GitHub user")?;

    decode_response(response, StatusCode::OK, "GitHub user").await
  }
}
