//! DispatchCoordinator - fan-out, join barrier, outcome aggregation
//!
//! The one place that owns the outcome table. Backends settle their reply
//! slots; the coordinator writes each report slot exactly once, after every
//! launched unit has finished.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use contracts::{
    CompletionReport, DestinationOutcome, DestinationSelector, UploadError, UploadRequest,
};

use crate::handle::TransferTicket;
use crate::registry::TargetRegistry;

/// Reason recorded when a worker died without settling its reply
const WORKER_DIED: &str = "backend worker terminated unexpectedly";

/// Runs one upload against the registry's destinations
pub struct DispatchCoordinator {
    registry: TargetRegistry,
}

impl DispatchCoordinator {
    /// Create a coordinator over a built registry
    pub fn new(registry: TargetRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry (ids, metrics)
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Release the registry, e.g. to shut its workers down
    pub fn into_registry(self) -> TargetRegistry {
        self.registry
    }

    /// Distribute one file to the selected destinations and aggregate the
    /// per-destination outcomes.
    ///
    /// An empty selector targets every registered destination. Selector
    /// ids that are not registered fail the whole run with
    /// `UnknownDestination` before any transfer starts. Destination
    /// failures never abort siblings; they surface as `Failed` slots in
    /// the report. The report is only materialized after every launched
    /// unit has settled.
    ///
    /// # Errors
    /// - `UnknownDestination` when the selector names an unregistered id
    #[instrument(
        name = "dispatch_run",
        skip(self, request, selector),
        fields(file = %request.display_name())
    )]
    pub async fn run(
        &self,
        request: UploadRequest,
        selector: &DestinationSelector,
    ) -> Result<CompletionReport, UploadError> {
        // Fail fast: a bad selector is a caller error, not a transfer
        // problem, and no backend may be invoked for it
        for id in selector.iter() {
            self.registry.resolve(id)?;
        }

        let request = Arc::new(request);

        // Fan out: one unit per effective destination, submitted before
        // any reply is awaited so all transfers run concurrently
        let mut units: Vec<(String, Option<TransferTicket>)> =
            Vec::with_capacity(self.registry.len());
        for handle in self.registry.iter() {
            let destination = handle.destination().to_string();
            if selector.targets(&destination) {
                let ticket = handle.submit(Arc::clone(&request)).await;
                units.push((destination, Some(ticket)));
            } else {
                debug!(destination = %destination, "Excluded by selector");
                units.push((destination, None));
            }
        }

        let launched = units.iter().filter(|(_, t)| t.is_some()).count();
        info!(
            destinations = self.registry.len(),
            launched,
            "Dispatch started"
        );

        // Join barrier: every launched unit settles before the report
        // exists. Awaiting tickets in registry order does not serialize
        // the transfers; they were all submitted above.
        let mut report = CompletionReport::new();
        for (destination, unit) in units {
            let outcome = match unit {
                None => DestinationOutcome::NotAttempted,
                Some(ticket) => match ticket.await {
                    Ok(Ok(())) => DestinationOutcome::Succeeded,
                    Ok(Err(e)) => DestinationOutcome::Failed {
                        reason: e.to_string(),
                    },
                    // Worker died mid-job (backend fault); isolate it
                    Err(_) => DestinationOutcome::Failed {
                        reason: WORKER_DIED.to_string(),
                    },
                },
            };
            report.record(destination, outcome);
        }

        info!(
            all_succeeded = report.all_succeeded(),
            "Dispatch complete"
        );
        Ok(report)
    }
}
