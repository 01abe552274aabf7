//! DestinationOutcome and CompletionReport - the aggregated run result

use serde::{Deserialize, Serialize};

/// Result of one destination in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DestinationOutcome {
    /// Transfer completed and was accepted by the destination
    Succeeded,
    /// Transfer was attempted and failed; the reason is preserved verbatim
    Failed { reason: String },
    /// Destination was excluded by the run's selector
    NotAttempted,
}

impl DestinationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One report row: a destination identifier and its settled outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub destination: String,
    pub outcome: DestinationOutcome,
}

/// Per-destination outcomes of a finished run, in registration order.
///
/// Only materialized after every launched transfer has settled; readers
/// never observe a partial report. Each destination appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    entries: Vec<ReportEntry>,
}

impl CompletionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a destination's settled outcome.
    ///
    /// Slots are written exactly once; a duplicate destination is a
    /// coordinator bug.
    pub fn record(&mut self, destination: impl Into<String>, outcome: DestinationOutcome) {
        let destination = destination.into();
        debug_assert!(
            self.outcome(&destination).is_none(),
            "duplicate report slot for '{destination}'"
        );
        self.entries.push(ReportEntry {
            destination,
            outcome,
        });
    }

    /// Outcome for a destination, if it appears in the report
    pub fn outcome(&self, destination: &str) -> Option<&DestinationOutcome> {
        self.entries
            .iter()
            .find(|e| e.destination == destination)
            .map(|e| &e.outcome)
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no attempted destination failed.
    ///
    /// `NotAttempted` entries do not count against success.
    pub fn all_succeeded(&self) -> bool {
        !self.entries.iter().any(|e| e.outcome.is_failed())
    }

    /// Render the report for an operator console.
    ///
    /// One line per destination in registration order, never
    /// completion-arrival order, so output is stable across runs.
    pub fn summarize(&self) -> (bool, Vec<String>) {
        let lines = self
            .entries
            .iter()
            .map(|e| {
                let name = capitalize(&e.destination);
                match &e.outcome {
                    DestinationOutcome::Succeeded => {
                        format!("{name} uploaded successfully.")
                    }
                    DestinationOutcome::Failed { .. } => format!("{name} upload failed."),
                    DestinationOutcome::NotAttempted => format!("{name} not attempted."),
                }
            })
            .collect();
        (self.all_succeeded(), lines)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
