//! BackendHandle - manages a backend with isolated queue and worker task

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use contracts::{TransferBackend, UploadError, UploadRequest};

use crate::metrics::TransferMetrics;

/// One submitted unit of work: the shared request plus the reply slot the
/// coordinator joins on
struct TransferJob {
    request: Arc<UploadRequest>,
    reply: oneshot::Sender<Result<(), UploadError>>,
}

/// Reply side of a submitted transfer; resolves once the worker settles it
pub type TransferTicket = oneshot::Receiver<Result<(), UploadError>>;

/// Handle to a running backend worker
///
/// The worker task exclusively owns the backend value, so calls to one
/// backend instance are serialized by construction. The worker is also the
/// fault boundary: a panicking backend kills only its own worker, which the
/// coordinator observes as a dropped reply and converts to a failed
/// outcome.
#[derive(Debug)]
pub struct BackendHandle {
    /// Destination identifier
    destination: String,
    /// Channel to send jobs to the worker
    tx: mpsc::Sender<TransferJob>,
    /// Shared metrics
    metrics: Arc<TransferMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl BackendHandle {
    /// Create a new BackendHandle and spawn the worker task
    pub fn spawn<B: TransferBackend + Send + 'static>(backend: B, queue_capacity: usize) -> Self {
        let destination = backend.destination().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity);
        let metrics = Arc::new(TransferMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_destination = destination.clone();

        let worker_handle = tokio::spawn(async move {
            backend_worker(backend, rx, worker_metrics, worker_destination).await;
        });

        Self {
            destination,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get destination identifier
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<TransferMetrics> {
        &self.metrics
    }

    /// Submit a transfer to the backend worker.
    ///
    /// Always returns a ticket. If the worker has died (a backend panicked
    /// on an earlier job), the job is dropped and the ticket resolves to a
    /// closed-channel error that the coordinator records as a failure.
    pub async fn submit(&self, request: Arc<UploadRequest>) -> TransferTicket {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = TransferJob {
            request,
            reply: reply_tx,
        };

        if self.tx.send(job).await.is_err() {
            error!(destination = %self.destination, "Backend worker closed unexpectedly");
        }
        reply_rx
    }

    /// Shutdown the backend worker gracefully
    #[instrument(name = "backend_handle_shutdown", skip(self))]
    pub async fn shutdown(self) {
        // Drop sender to signal worker to stop
        drop(self.tx);
        // Wait for worker to finish
        if let Err(e) = self.worker_handle.await {
            error!(destination = %self.destination, error = ?e, "Worker task panicked");
        }
        debug!(destination = %self.destination, "BackendHandle shutdown complete");
    }
}

/// Worker task that consumes jobs and drives the backend
#[instrument(
    name = "backend_worker_loop",
    skip(backend, rx, metrics),
    fields(destination = %destination)
)]
async fn backend_worker<B: TransferBackend>(
    backend: B,
    mut rx: mpsc::Receiver<TransferJob>,
    metrics: Arc<TransferMetrics>,
    destination: String,
) {
    debug!(destination = %destination, "Backend worker started");

    while let Some(job) = rx.recv().await {
        metrics.inc_attempt_count();

        let result = backend.transfer(&job.request).await;
        match &result {
            Ok(()) => {
                metrics.inc_success_count();
                info!(
                    destination = %destination,
                    file = %job.request.display_name(),
                    "Transfer complete"
                );
            }
            Err(e) => {
                metrics.inc_failure_count();
                error!(
                    destination = %destination,
                    file = %job.request.display_name(),
                    error = %e,
                    "Transfer failed"
                );
                // Keep consuming - one failed job must not wedge the worker
            }
        }

        // The coordinator may have gone away; nothing to settle then
        let _ = job.reply.send(result);
    }

    debug!(destination = %destination, "Backend worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::time::{sleep, Duration};

    fn sample_request() -> (tempfile::TempDir, UploadRequest) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"data").unwrap();
        let request = UploadRequest::new(&path).unwrap();
        (dir, request)
    }

    /// Mock backend for testing
    struct MockBackend {
        destination: String,
        transfer_count: Arc<AtomicU64>,
        should_fail: bool,
        should_panic: bool,
        delay_ms: u64,
    }

    impl MockBackend {
        fn succeeding(destination: &str, counter: Arc<AtomicU64>) -> Self {
            Self {
                destination: destination.to_string(),
                transfer_count: counter,
                should_fail: false,
                should_panic: false,
                delay_ms: 0,
            }
        }
    }

    impl TransferBackend for MockBackend {
        fn destination(&self) -> &str {
            &self.destination
        }

        async fn transfer(&self, _request: &UploadRequest) -> Result<(), UploadError> {
            if self.delay_ms > 0 {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.should_panic {
                panic!("mock backend fault");
            }
            if self.should_fail {
                return Err(UploadError::transfer(&self.destination, "mock failure"));
            }
            self.transfer_count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_backend_handle_basic() {
        let count = Arc::new(AtomicU64::new(0));
        let handle = BackendHandle::spawn(MockBackend::succeeding("mock", Arc::clone(&count)), 4);

        let (_dir, request) = sample_request();
        let request = Arc::new(request);
        let ticket = handle.submit(Arc::clone(&request)).await;
        assert!(ticket.await.unwrap().is_ok());
        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert_eq!(handle.metrics().success_count(), 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_backend_handle_failure_reported() {
        let handle = BackendHandle::spawn(
            MockBackend {
                destination: "failing".to_string(),
                transfer_count: Arc::new(AtomicU64::new(0)),
                should_fail: true,
                should_panic: false,
                delay_ms: 0,
            },
            4,
        );

        let (_dir, request) = sample_request();
        let ticket = handle.submit(Arc::new(request)).await;
        let result = ticket.await.unwrap();
        assert!(matches!(result, Err(UploadError::Transfer { .. })));
        assert_eq!(handle.metrics().failure_count(), 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_backend_panic_resolves_ticket_with_closed_channel() {
        let handle = BackendHandle::spawn(
            MockBackend {
                destination: "panicking".to_string(),
                transfer_count: Arc::new(AtomicU64::new(0)),
                should_fail: false,
                should_panic: true,
                delay_ms: 0,
            },
            4,
        );

        let (_dir, request) = sample_request();
        let ticket = handle.submit(Arc::new(request)).await;
        // Worker dies mid-job; the dropped reply surfaces as RecvError
        assert!(ticket.await.is_err());
    }

    #[tokio::test]
    async fn test_serialized_calls_on_one_instance() {
        let count = Arc::new(AtomicU64::new(0));
        let handle = BackendHandle::spawn(
            MockBackend {
                destination: "slow".to_string(),
                transfer_count: Arc::clone(&count),
                should_fail: false,
                should_panic: false,
                delay_ms: 20,
            },
            4,
        );

        let (_dir, request) = sample_request();
        let request = Arc::new(request);
        let first = handle.submit(Arc::clone(&request)).await;
        let second = handle.submit(Arc::clone(&request)).await;

        assert!(first.await.unwrap().is_ok());
        assert!(second.await.unwrap().is_ok());
        assert_eq!(count.load(Ordering::Relaxed), 2);

        handle.shutdown().await;
    }
}
