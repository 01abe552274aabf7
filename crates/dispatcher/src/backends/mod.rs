//! Backend implementations
//!
//! One module per destination type. Each backend is a thin adapter: it
//! frames the provider's protocol and maps every failure into a typed
//! transfer error; retry, resume, progress, and credential acquisition
//! stay out.

mod broken;
mod dir;
mod dropbox;
mod ftp;
mod gdrive;
mod github;
mod http;
mod onedrive;
mod smtp;

pub use self::broken::MisconfiguredBackend;
pub use self::dir::DirBackend;
pub use self::dropbox::DropboxBackend;
pub use self::ftp::FtpBackend;
pub use self::gdrive::GdriveBackend;
pub use self::github::GithubBackend;
pub use self::onedrive::OnedriveBackend;
pub use self::smtp::SmtpBackend;

pub(crate) use self::http::{build_client, expect_success, read_source};

use contracts::UploadError;

/// Resolve a required configuration field, treating empty as missing
pub(crate) fn require_field(
    destination: &str,
    field: &str,
    value: Option<&str>,
) -> Result<String, UploadError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(UploadError::configuration(
            destination,
            format!("{field} not configured"),
        )),
    }
}
