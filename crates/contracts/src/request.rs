//! UploadRequest - the immutable per-run input value

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::UploadError;

/// A single file to distribute, with the name it should carry at each
/// destination and the recipients for notification-style backends.
///
/// Immutable once constructed. The display name is derived from the file
/// stem exactly once, at construction; it is never recomputed.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    source: PathBuf,
    display_name: String,
    recipients: Vec<String>,
}

impl UploadRequest {
    /// Create a request for the file at `source`.
    ///
    /// The display name defaults to the file's base name without extension.
    ///
    /// # Errors
    /// - `InvalidRequest` if the path is empty, missing, not a regular
    ///   file, or not readable
    pub fn new(source: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let source = source.into();

        if source.as_os_str().is_empty() {
            return Err(UploadError::invalid_request("source path is empty"));
        }

        let meta = std::fs::metadata(&source).map_err(|e| {
            UploadError::invalid_request(format!("cannot stat '{}': {e}", source.display()))
        })?;
        if !meta.is_file() {
            return Err(UploadError::invalid_request(format!(
                "'{}' is not a regular file",
                source.display()
            )));
        }
        // Readability check up front, so every backend sees the same file state
        File::open(&source).map_err(|e| {
            UploadError::invalid_request(format!("cannot read '{}': {e}", source.display()))
        })?;

        let display_name = derive_display_name(&source);

        Ok(Self {
            source,
            display_name,
            recipients: Vec::new(),
        })
    }

    /// Override the display name. An empty name keeps the derived default.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.display_name = name;
        }
        self
    }

    /// Set the recipient list for notification-style backends.
    pub fn with_recipients(mut self, recipients: impl IntoIterator<Item = String>) -> Self {
        self.recipients = recipients.into_iter().collect();
        self
    }

    /// Path of the file to transfer
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Name the file carries at each destination
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Recipients for notification-style backends (may be empty)
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }
}

/// Base name without extension, lossy on non-UTF8 paths
fn derive_display_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
