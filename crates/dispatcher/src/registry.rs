//! TargetRegistry - ordered destination roster and backend factory

use tracing::{instrument, warn};

use contracts::{BackendConfig, DestinationConfig, TransferBackend, UploadError, UploadPlan};

use crate::backends::{
    DirBackend, DropboxBackend, FtpBackend, GdriveBackend, GithubBackend, MisconfiguredBackend,
    OnedriveBackend, SmtpBackend,
};
use crate::handle::BackendHandle;
use crate::metrics::MetricsSnapshot;

/// Per-worker job queue depth; one slot per in-flight run is plenty
const JOB_QUEUE_CAPACITY: usize = 4;

/// The fixed destination roster for this process.
///
/// Holds one running `BackendHandle` per destination, in registration
/// order. Read-only after construction; report order follows registration
/// order.
#[derive(Default)]
pub struct TargetRegistry {
    handles: Vec<BackendHandle>,
}

impl TargetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend handle at the end of the roster.
    ///
    /// Identifier uniqueness is the caller's responsibility (the plan
    /// validator enforces it for configured rosters).
    pub fn register(&mut self, handle: BackendHandle) {
        debug_assert!(
            !self.contains(handle.destination()),
            "duplicate destination '{}'",
            handle.destination()
        );
        self.handles.push(handle);
    }

    /// Look up a destination's backend handle
    ///
    /// # Errors
    /// `UnknownDestination` if the id is not registered
    pub fn resolve(&self, id: &str) -> Result<&BackendHandle, UploadError> {
        self.handles
            .iter()
            .find(|h| h.destination() == id)
            .ok_or_else(|| UploadError::unknown_destination(id))
    }

    /// True when `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.handles.iter().any(|h| h.destination() == id)
    }

    /// Destination identifiers in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(BackendHandle::destination)
    }

    /// Handles in registration order
    pub fn iter(&self) -> impl Iterator<Item = &BackendHandle> {
        self.handles.iter()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Get metrics for all backends
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.destination().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Shutdown all backend workers gracefully
    pub async fn shutdown(self) {
        for handle in self.handles {
            handle.shutdown().await;
        }
    }
}

/// Build a registry from an upload plan.
///
/// A destination whose backend cannot be constructed stays registered,
/// bound to a stub that fails every transfer with the construction error;
/// the run reports it instead of skipping it.
#[instrument(name = "registry_build", skip(plan), fields(destinations = plan.destinations.len()))]
pub fn build_registry(plan: &UploadPlan) -> TargetRegistry {
    let mut registry = TargetRegistry::new();
    for destination in &plan.destinations {
        registry.register(create_backend_handle(destination));
    }
    registry
}

/// Create a BackendHandle from one destination's configuration
#[instrument(
    name = "registry_create_backend",
    skip(config),
    fields(destination = %config.id, kind = config.backend.kind())
)]
fn create_backend_handle(config: &DestinationConfig) -> BackendHandle {
    let id = config.id.as_str();
    match &config.backend {
        BackendConfig::Gdrive {
            access_token,
            folder_id,
        } => spawn_or_stub(
            id,
            GdriveBackend::new(id, access_token.as_deref(), folder_id.as_deref()),
        ),
        BackendConfig::Dropbox { token } => {
            spawn_or_stub(id, DropboxBackend::new(id, token.as_deref()))
        }
        BackendConfig::Github { token, repo } => spawn_or_stub(
            id,
            GithubBackend::new(id, token.as_deref(), repo.as_deref()),
        ),
        BackendConfig::Onedrive { access_token } => {
            spawn_or_stub(id, OnedriveBackend::new(id, access_token.as_deref()))
        }
        BackendConfig::Ftp {
            host,
            port,
            username,
            password,
        } => spawn_or_stub(
            id,
            FtpBackend::new(
                id,
                host.as_deref(),
                *port,
                username.as_deref(),
                password.as_deref(),
            ),
        ),
        BackendConfig::Smtp {
            host,
            port,
            username,
            password,
            protocol,
        } => spawn_or_stub(
            id,
            SmtpBackend::new(
                id,
                host.as_deref(),
                *port,
                username.as_deref(),
                password.as_deref(),
                *protocol,
            ),
        ),
        BackendConfig::Dir { path } => spawn_or_stub(id, DirBackend::new(id, path.as_deref())),
    }
}

/// Spawn the constructed backend, or a failing stub carrying the
/// construction error
fn spawn_or_stub<B: TransferBackend + Send + 'static>(
    id: &str,
    built: Result<B, UploadError>,
) -> BackendHandle {
    match built {
        Ok(backend) => BackendHandle::spawn(backend, JOB_QUEUE_CAPACITY),
        Err(e) => {
            warn!(
                destination = %id,
                error = %e,
                "Backend construction failed, destination will report as failed"
            );
            BackendHandle::spawn(MisconfiguredBackend::new(id, e.to_string()), JOB_QUEUE_CAPACITY)
        }
    }
}
