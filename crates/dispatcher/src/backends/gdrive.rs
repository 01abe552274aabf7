//! GdriveBackend - Google Drive multipart upload

use contracts::{TransferBackend, UploadError, UploadRequest};
use tracing::instrument;

use super::{build_client, expect_success, read_source, require_field};

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";

/// Uploads the file to Google Drive under the display name
pub struct GdriveBackend {
    destination: String,
    access_token: String,
    folder_id: Option<String>,
    client: reqwest::Client,
}

impl GdriveBackend {
    /// Create a new GdriveBackend
    ///
    /// # Errors
    /// `Configuration` if the access token is missing or empty
    pub fn new(
        destination: impl Into<String>,
        access_token: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<Self, UploadError> {
        let destination = destination.into();
        let access_token = require_field(&destination, "access_token", access_token)?;
        let client = build_client(&destination)?;

        Ok(Self {
            destination,
            access_token,
            folder_id: folder_id.filter(|f| !f.is_empty()).map(str::to_string),
            client,
        })
    }
}

impl TransferBackend for GdriveBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "gdrive_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let bytes = read_source(&self.destination, request).await?;

        let mut metadata = serde_json::json!({ "name": request.display_name() });
        if let Some(folder_id) = &self.folder_id {
            metadata["parents"] = serde_json::json!([folder_id]);
        }

        let metadata_part = reqwest::multipart::Part::text(metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| UploadError::transfer(&self.destination, format!("metadata part: {e}")))?;
        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(request.display_name().to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| UploadError::transfer(&self.destination, format!("file part: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&self.access_token)
            .multipart(form)
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
    fn test_missing_token_is_configuration_error() {
        let result = GdriveBackend::new("gdrive", None, None);
        assert!(matches!(result, Err(UploadError::Configuration { .. })));
    }

    #[test]
    fn test_empty_folder_id_treated_as_root() {
        let backend = GdriveBackend::new("gdrive", Some("tok"), Some("")).unwrap();
        assert!(backend.folder_id.is_none());
    }
}
