//! MisconfiguredBackend - placeholder for destinations that failed to build

use contracts::{TransferBackend, UploadError, UploadRequest};

/// Stands in for a backend whose construction failed.
///
/// Keeps the destination in the roster so the run reports it as failed
/// with the construction error, instead of silently skipping it.
pub struct MisconfiguredBackend {
    destination: String,
    reason: String,
}

impl MisconfiguredBackend {
    pub fn new(destination: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            reason: reason.into(),
        }
    }
}

impl TransferBackend for MisconfiguredBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    async fn transfer(&self, _request: &UploadRequest) -> Result<(), UploadError> {
        Err(UploadError::configuration(
            &self.destination,
            self.reason.clone(),
        ))
    }
}
