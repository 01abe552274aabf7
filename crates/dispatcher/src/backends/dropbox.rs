//! DropboxBackend - Dropbox content upload

use contracts::{TransferBackend, UploadError, UploadRequest};
use tracing::instrument;

use super::{build_client, expect_success, read_source, require_field};

const UPLOAD_URL: &str = "https://content.dropboxapi.com/2/files/upload";

/// Uploads the file to the Dropbox root folder under the display name
pub struct DropboxBackend {
    destination: String,
    token: String,
    client: reqwest::Client,
}

impl DropboxBackend {
    /// Create a new DropboxBackend
    ///
    /// # Errors
    /// `Configuration` if the access token is missing or empty
    pub fn new(destination: impl Into<String>, token: Option<&str>) -> Result<Self, UploadError> {
        let destination = destination.into();
        let token = require_field(&destination, "token", token)?;
        let client = build_client(&destination)?;

        Ok(Self {
            destination,
            token,
            client,
        })
    }
}

impl TransferBackend for DropboxBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "dropbox_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let bytes = read_source(&self.destination, request).await?;

        let api_arg = serde_json::json!({
            "path": format!("/{}", request.display_name()),
            "mode": "add",
            "autorename": false,
            "mute": false,
        });

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", api_arg.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| UploadError::transfer(&self.destination, format!("request: {e}")))?;

        expect_success(&self.destination, response).await
    }
}
