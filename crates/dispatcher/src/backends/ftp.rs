//! FtpBackend - FTP STOR under the display name
//!
//! Uses the blocking FTP client on the blocking thread pool; the control
//! connection lives for one transfer and is closed on drop on every exit
//! path.

use contracts::{TransferBackend, UploadError, UploadRequest};
use suppaftp::types::FileType;
use suppaftp::FtpStream;
use tracing::instrument;

use super::require_field;

/// Stores the file on an FTP server under the display name.
///
/// Missing credentials fall back to anonymous login.
pub struct FtpBackend {
    destination: String,
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl FtpBackend {
    /// Create a new FtpBackend
    ///
    /// # Errors
    /// `Configuration` if the host is missing or empty
    pub fn new(
        destination: impl Into<String>,
        host: Option<&str>,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, UploadError> {
        let destination = destination.into();
        let host = require_field(&destination, "host", host)?;

        Ok(Self {
            destination,
            host,
            port,
            username: username.unwrap_or("anonymous").to_string(),
            password: password.unwrap_or("anonymous@").to_string(),
        })
    }
}

impl TransferBackend for FtpBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "ftp_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let destination = self.destination.clone();
        let addr = format!("{}:{}", self.host, self.port);
        let username = self.username.clone();
        let password = self.password.clone();
        let source = request.source().to_path_buf();
        let name = request.display_name().to_string();

        let upload = move || -> Result<(), UploadError> {
            let mut ftp = FtpStream::connect(&addr)
                .map_err(|e| UploadError::transfer(&destination, format!("connect {addr}: {e}")))?;
            ftp.login(&username, &password)
                .map_err(|e| UploadError::transfer(&destination, format!("login: {e}")))?;
            ftp.transfer_type(FileType::Binary)
                .map_err(|e| UploadError::transfer(&destination, format!("binary mode: {e}")))?;

            let mut file = std::fs::File::open(&source).map_err(|e| {
                UploadError::transfer(&destination, format!("read '{}': {e}", source.display()))
            })?;
            ftp.put_file(&name, &mut file)
                .map_err(|e| UploadError::transfer(&destination, format!("STOR {name}: {e}")))?;

            ftp.quit()
                .map_err(|e| UploadError::transfer(&destination, format!("quit: {e}")))?;
            Ok(())
        };

        tokio::task::spawn_blocking(upload)
            .await
            .map_err(|e| UploadError::transfer(&self.destination, format!("worker: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_host_is_configuration_error() {
        let result = FtpBackend::new("ftp", None, 21, None, None);
        assert!(matches!(result, Err(UploadError::Configuration { .. })));
    }

    #[test]
    fn test_missing_credentials_fall_back_to_anonymous() {
        let backend = FtpBackend::new("ftp", Some("ftp.example.com"), 21, None, None).unwrap();
        assert_eq!(backend.username, "anonymous");
    }
}
