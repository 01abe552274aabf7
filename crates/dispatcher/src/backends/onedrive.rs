//! OnedriveBackend - Microsoft Graph simple upload

use contracts::{TransferBackend, UploadError, UploadRequest};
use tracing::instrument;

use super::{build_client, expect_success, read_source, require_field};

const GRAPH_ROOT: &str = "https://graph.microsoft.com/v1.0";

/// Uploads the file to the OneDrive root folder under the display name
pub struct OnedriveBackend {
    destination: String,
    access_token: String,
    client: reqwest::Client,
}

impl OnedriveBackend {
    /// Create a new OnedriveBackend
    ///
    /// # Errors
    /// `Configuration` if the access token is missing or empty
    pub fn new(
        destination: impl Into<String>,
        access_token: Option<&str>,
    ) -> Result<Self, UploadError> {
        let destination = destination.into();
        let access_token = require_field(&destination, "access_token", access_token)?;
        let client = build_client(&destination)?;

        Ok(Self {
            destination,
            access_token,
            client,
        })
    }
}

impl TransferBackend for OnedriveBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "onedrive_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let bytes = read_source(&self.destination, request).await?;

        let url = format!(
            "{GRAPH_ROOT}/me/drive/root:/{}:/content",
            request.display_name()
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| UploadError::transfer(&self.destination, format!("request: {e}")))?;

        expect_success(&self.destination, response).await
    }
}
