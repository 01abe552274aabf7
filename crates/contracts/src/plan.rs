//! UploadPlan - Config Loader output
//!
//! Describes the full destination roster for one process: which
//! destinations exist, in what order they report, and the configuration
//! each backend is constructed from.
//!
//! Credential values are carried here explicitly; backends never read
//! process environment themselves. Credential fields are optional at parse
//! time on purpose: a destination with missing credentials still registers
//! and reports a failed outcome, instead of aborting the whole plan.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plan format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanVersion {
    #[default]
    V1,
}

/// Complete upload plan: the ordered destination roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPlan {
    /// Plan version
    #[serde(default)]
    pub version: PlanVersion,

    /// Destination definitions; report order follows this order
    pub destinations: Vec<DestinationConfig>,
}

impl UploadPlan {
    /// Destination identifiers in registration order
    pub fn destination_ids(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().map(|d| d.id.as_str())
    }
}

/// One destination entry: identifier plus backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Unique identifier (report slot key, selector key)
    pub id: String,

    /// Backend type and its construction parameters
    #[serde(flatten)]
    pub backend: BackendConfig,
}

/// Backend construction parameters, tagged by destination type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Google Drive multipart upload
    Gdrive {
        #[serde(skip_serializing_if = "Option::is_none")]
        access_token: Option<String>,
        /// Target folder; root when unset
        #[serde(default, skip_serializing_if = "Option::is_none")]
        folder_id: Option<String>,
    },

    /// Dropbox content upload
    Dropbox {
        #[serde(skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// GitHub repository contents API
    Github {
        #[serde(skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        /// "owner/name" form
        #[serde(skip_serializing_if = "Option::is_none")]
        repo: Option<String>,
    },

    /// OneDrive simple upload via Microsoft Graph
    Onedrive {
        #[serde(skip_serializing_if = "Option::is_none")]
        access_token: Option<String>,
    },

    /// FTP STOR under the display name
    Ftp {
        #[serde(skip_serializing_if = "Option::is_none")]
        host: Option<String>,
        #[serde(default = "default_ftp_port")]
        port: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },

    /// Email with the file attached
    Smtp {
        #[serde(skip_serializing_if = "Option::is_none")]
        host: Option<String>,
        #[serde(default = "default_smtp_port")]
        port: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<String>,
        /// Connection security
        #[serde(default)]
        protocol: SmtpProtocol,
    },

    /// Copy into a local directory
    Dir {
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
}

fn default_ftp_port() -> u16 {
    21
}

fn default_smtp_port() -> u16 {
    587
}

impl BackendConfig {
    /// Type name, matching the serde tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gdrive { .. } => "gdrive",
            Self::Dropbox { .. } => "dropbox",
            Self::Github { .. } => "github",
            Self::Onedrive { .. } => "onedrive",
            Self::Ftp { .. } => "ftp",
            Self::Smtp { .. } => "smtp",
            Self::Dir { .. } => "dir",
        }
    }
}

/// SMTP connection security
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmtpProtocol {
    /// Plaintext session upgraded via STARTTLS
    #[default]
    Tls,
    /// Implicit TLS from the first byte
    Ssl,
    /// No transport security
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_deserializes_tagged_backends() {
        let json = r#"{
            "destinations": [
                { "id": "dropbox", "type": "dropbox", "token": "tok" },
                { "id": "github", "type": "github", "token": "tok", "repo": "me/files" },
                { "id": "ftp", "type": "ftp", "host": "ftp.example.com" }
            ]
        }"#;

        let plan: UploadPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.version, PlanVersion::V1);
        assert_eq!(
            plan.destination_ids().collect::<Vec<_>>(),
            ["dropbox", "github", "ftp"]
        );

        match &plan.destinations[2].backend {
            BackendConfig::Ftp { host, port, .. } => {
                assert_eq!(host.as_deref(), Some("ftp.example.com"));
                assert_eq!(*port, 21);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn test_missing_credentials_still_parse() {
        let json = r#"{
            "destinations": [{ "id": "dropbox", "type": "dropbox" }]
        }"#;

        let plan: UploadPlan = serde_json::from_str(json).unwrap();
        match &plan.destinations[0].backend {
            BackendConfig::Dropbox { token } => assert!(token.is_none()),
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn test_smtp_protocol_default_is_starttls() {
        let json = r#"{ "id": "smtp", "type": "smtp", "host": "mail.example.com" }"#;
        let config: DestinationConfig = serde_json::from_str(json).unwrap();
        match config.backend {
            BackendConfig::Smtp { protocol, port, .. } => {
                assert_eq!(protocol, SmtpProtocol::Tls);
                assert_eq!(port, 587);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }
}
