//! TransferBackend trait - Dispatcher output interface
//!
//! Defines the abstract transfer capability, one implementation per
//! destination type.

use crate::{UploadError, UploadRequest};

/// Transfer capability trait
///
/// A backend owns its own authentication, connection setup, protocol
/// framing, and resource cleanup on every exit path. Any failure must come
/// back as an `Err` value; faults must never cross this boundary (the
/// dispatch worker converts a panic into a failed outcome, but a
/// well-behaved backend does not rely on that).
///
/// One backend instance receives calls serialized by its owning worker, so
/// implementations need `&self` but not internal synchronization. For
/// notification-style backends (e.g. email), `Ok(())` means the upstream
/// transport accepted the message, not that every recipient received it.
#[trait_variant::make(TransferBackend: Send)]
pub trait LocalTransferBackend {
    /// Destination identifier this backend serves (used for logging and
    /// report slots)
    fn destination(&self) -> &str;

    /// Transfer the request's file to this destination
    ///
    /// # Errors
    /// Returns a `Transfer` or `Configuration` error with the destination
    /// name attached
    async fn transfer(&self, request: &UploadRequest) -> Result<(), UploadError>;
}
