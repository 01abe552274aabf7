//! DirBackend - copies the file into a local directory
//!
//! Useful for mounted fan-out targets (NFS, synced folders) and for
//! exercising the engine without network credentials.

use std::path::{Path, PathBuf};

use contracts::{TransferBackend, UploadError, UploadRequest};
use tracing::{debug, instrument};

/// Backend that copies the file into a target directory under the display
/// name
pub struct DirBackend {
    destination: String,
    base_path: PathBuf,
}

impl DirBackend {
    /// Create a new DirBackend
    ///
    /// # Errors
    /// `Configuration` if no path is configured
    pub fn new(destination: impl Into<String>, path: Option<&Path>) -> Result<Self, UploadError> {
        let destination = destination.into();
        let base_path = path
            .ok_or_else(|| UploadError::configuration(&destination, "path not configured"))?
            .to_path_buf();

        Ok(Self {
            destination,
            base_path,
        })
    }
}

impl TransferBackend for DirBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "dir_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| {
                UploadError::transfer(
                    &self.destination,
                    format!("create '{}': {e}", self.base_path.display()),
                )
            })?;

        let target = self.base_path.join(request.display_name());
        let bytes = tokio::fs::copy(request.source(), &target)
            .await
            .map_err(|e| {
                UploadError::transfer(
                    &self.destination,
                    format!("copy to '{}': {e}", target.display()),
                )
            })?;

        debug!(
            destination = %self.destination,
            target = %target.display(),
            bytes,
            "Copied"
        );
        Ok(())
    }
}
