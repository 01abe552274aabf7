//! SmtpBackend - email with the file attached
//!
//! Success means the upstream transport accepted the message, not that
//! every recipient received it.

use contracts::{SmtpProtocol, TransferBackend, UploadError, UploadRequest};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use super::{read_source, require_field};

const SUBJECT: &str = "File Upload";

/// Sends the file as an attachment to the request's recipients
pub struct SmtpBackend {
    destination: String,
    host: String,
    port: u16,
    username: String,
    password: String,
    protocol: SmtpProtocol,
}

impl SmtpBackend {
    /// Create a new SmtpBackend
    ///
    /// The username doubles as the From address.
    ///
    /// # Errors
    /// `Configuration` if host, username, or password is missing or empty
    pub fn new(
        destination: impl Into<String>,
        host: Option<&str>,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        protocol: SmtpProtocol,
    ) -> Result<Self, UploadError> {
        let destination = destination.into();
        let host = require_field(&destination, "host", host)?;
        let username = require_field(&destination, "username", username)?;
        let password = require_field(&destination, "password", password)?;

        Ok(Self {
            destination,
            host,
            port,
            username,
            password,
            protocol,
        })
    }

    fn build_message(&self, request: &UploadRequest, body: Vec<u8>) -> Result<Message, UploadError> {
        let from: Mailbox = self.username.parse().map_err(|e| {
            UploadError::transfer(&self.destination, format!("sender address: {e}"))
        })?;

        let mut builder = Message::builder().from(from).subject(SUBJECT);
        for recipient in request.recipients() {
            let to: Mailbox = recipient.parse().map_err(|e| {
                UploadError::transfer(
                    &self.destination,
                    format!("recipient '{recipient}': {e}"),
                )
            })?;
            builder = builder.to(to);
        }

        let content_type = ContentType::parse("application/octet-stream").map_err(|e| {
            UploadError::transfer(&self.destination, format!("attachment type: {e}"))
        })?;
        let attachment =
            Attachment::new(request.display_name().to_string()).body(body, content_type);

        builder
            .multipart(MultiPart::mixed().singlepart(attachment))
            .map_err(|e| UploadError::transfer(&self.destination, format!("message: {e}")))
    }

    fn build_transport(&self) -> Result<SmtpTransport, UploadError> {
        let relay = match self.protocol {
            SmtpProtocol::Tls => SmtpTransport::starttls_relay(self.host.as_str()),
            SmtpProtocol::Ssl => SmtpTransport::relay(self.host.as_str()),
            SmtpProtocol::Plain => Ok(SmtpTransport::builder_dangerous(self.host.as_str())),
        }
        .map_err(|e| UploadError::transfer(&self.destination, format!("relay {}: {e}", self.host)))?;

        Ok(relay
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .build())
    }
}

impl TransferBackend for SmtpBackend {
    fn destination(&self) -> &str {
        &self.destination
    }

    #[instrument(
        name = "smtp_transfer",
        skip(self, request),
        fields(destination = %self.destination, file = %request.display_name())
    )]
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError> {
        if request.recipients().is_empty() {
            return Err(UploadError::transfer(
                &self.destination,
                "no recipients in request",
            ));
        }

        let body = read_source(&self.destination, request).await?;
        let message = self.build_message(request, body)?;
        let transport = self.build_transport()?;

        let destination = self.destination.clone();
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| UploadError::transfer(&destination, format!("send: {e}")))
        })
        .await
        .map_err(|e| UploadError::transfer(&self.destination, format!("worker: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn backend() -> SmtpBackend {
        SmtpBackend::new(
            "smtp",
            Some("mail.example.com"),
            587,
            Some("sender@example.com"),
            Some("secret"),
            SmtpProtocol::Tls,
        )
        .unwrap()
    }

    fn request_with_recipients(recipients: Vec<String>) -> (tempfile::TempDir, UploadRequest) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"x")
            .unwrap();
        let request = UploadRequest::new(&path)
            .unwrap()
            .with_recipients(recipients);
        (dir, request)
    }

    #[test]
    fn test_missing_host_is_configuration_error() {
        let result = SmtpBackend::new(
            "smtp",
            None,
            587,
            Some("sender@example.com"),
            Some("secret"),
            SmtpProtocol::Tls,
        );
        assert!(matches!(result, Err(UploadError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_no_recipients_is_transfer_error() {
        let (_dir, request) = request_with_recipients(vec![]);
        let err = backend().transfer(&request).await.unwrap_err();
        assert!(err.to_string().contains("no recipients"));
    }

    #[test]
    fn test_message_builds_with_attachment() {
        let (_dir, request) =
            request_with_recipients(vec!["ops@example.com".to_string()]);
        let message = backend().build_message(&request, b"x".to_vec());
        assert!(message.is_ok());
    }

    #[test]
    fn test_invalid_recipient_rejected() {
        let (_dir, request) = request_with_recipients(vec!["not an address".to_string()]);
        let message = backend().build_message(&request, b"x".to_vec());
        assert!(message.is_err());
    }
}
