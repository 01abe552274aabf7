//! GithubBackend - GitHub repository contents API

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use contracts::{TransferBackend, UploadError, UploadRequest};
use tracing::instrument;

use super::{build_client, expect_success, read_source, require_field};

const API_ROOT: &str = "https://api.github.com";
const COMMIT_MESSAGE: &str = "Uploaded via multisend";

/// Commits the file to the repository root under the display name
pub struct GithubBackend {
    destination: String,
    token: String,
    /// "owner/name" form
    repo: String,
    client: reqwest::Client,
}

impl GithubBackend {
    /// Create a new GithubBackend
    ///
    /// # Errors
    /// `Configuration` if the token or repository is missing or empty
    pub fn new(
        destination: impl Into<String>,
        token: Option<&str>,
        repo: Option<&str>,
    ) -> Result<Self, UploadError> {
        let destination = destination.into();
        let token = require_field(&destination, "token", token)?;
        let repo = require_field(&destination, "repo", repo)?;
        if !repo.contains('/') {
            return Err(UploadError::configuration(
                &destination,
                format!("repo '{repo}' must be in owner/name form"),
            ));
        }
        let client = build_client(&destination)?;

        Ok(Self {
            destination,
            token,
            repo,
            client,
        })
    }
}

impl TransferBackend for GithubBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "github_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let bytes = read_source(&self.destination, request).await?;

        let url = format!(
            "{API_ROOT}/repos/{}/contents/{}",
            self.repo,
            request.display_name()
        );
        let body = serde_json::json!({
            "message": COMMIT_MESSAGE,
            "content": BASE64.encode(&bytes),
        });

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, "multisend")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await
            .map_err(|e| UploadError::transfer(&self.destination, format!("request: {e}")))?;

        expect_success(&self.destination, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_repo_is_configuration_error() {
        let result = GithubBackend::new("github", Some("tok"), None);
        assert!(matches!(result, Err(UploadError::Configuration { .. })));
    }

    #[test]
    fn test_repo_without_owner_rejected() {
        let result = GithubBackend::new("github", Some("tok"), Some("files"));
        assert!(matches!(result, Err(UploadError::Configuration { .. })));
    }

    #[test]
    fn test_owner_name_repo_accepted() {
        assert!(GithubBackend::new("github", Some("tok"), Some("me/files")).is_ok());
    }
}
