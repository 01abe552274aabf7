//! # Dispatcher
//!
//! Concurrent multi-destination dispatch module.
//!
//! Responsibilities:
//! - Hold the destination roster (`TargetRegistry`)
//! - Fan one `UploadRequest` out to every selected destination
//! - Isolate per-destination failures behind worker boundaries
//! - Aggregate settled outcomes into a `CompletionReport` after the join
//!   barrier

pub mod backends;
pub mod coordinator;
pub mod handle;
pub mod metrics;
pub mod registry;

pub use contracts::{
    CompletionReport, DestinationOutcome, DestinationSelector, TransferBackend, UploadError,
    UploadRequest,
};

pub use backends::{
    DirBackend, DropboxBackend, FtpBackend, GdriveBackend, GithubBackend, MisconfiguredBackend,
    OnedriveBackend, SmtpBackend,
};
pub use coordinator::DispatchCoordinator;
pub use handle::{BackendHandle, TransferTicket};
pub use metrics::{MetricsSnapshot, TransferMetrics};
pub use registry::{build_registry, TargetRegistry};
