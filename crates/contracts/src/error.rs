//! Layered error definitions
//!
//! Categorized by source: request / plan / dispatch / transfer

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum UploadError {
    // ===== Request Errors =====
    /// Upload request could not be constructed
    #[error("invalid upload request: {message}")]
    InvalidRequest { message: String },

    // ===== Plan Errors =====
    /// Upload plan parse error
    #[error("plan parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upload plan validation error
    #[error("plan validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Dispatch Errors =====
    /// Selector references a destination that is not registered
    #[error("unknown destination: {id}")]
    UnknownDestination { id: String },

    // ===== Transfer Errors =====
    /// A backend could not be constructed from its configuration
    #[error("destination '{destination}' misconfigured: {message}")]
    Configuration {
        destination: String,
        message: String,
    },

    /// A single destination's transfer attempt failed
    #[error("transfer to '{destination}' failed: {message}")]
    Transfer {
        destination: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a plan parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a plan validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown destination error
    pub fn unknown_destination(id: impl Into<String>) -> Self {
        Self::UnknownDestination { id: id.into() }
    }

    /// Create a backend configuration error
    pub fn configuration(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a transfer error
    pub fn transfer(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transfer {
            destination: destination.into(),
            message: message.into(),
        }
    }
}
