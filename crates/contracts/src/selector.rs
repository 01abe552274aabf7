//! DestinationSelector - which destinations a run targets

use std::collections::BTreeSet;

/// The set of destination identifiers chosen for one run.
///
/// An empty selector means "all known destinations", not "no destinations".
/// The default-to-all policy is deliberate and load-bearing: callers that
/// pass no selection get a full fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationSelector {
    ids: BTreeSet<String>,
}

impl DestinationSelector {
    /// Selector targeting every registered destination
    pub fn all() -> Self {
        Self::default()
    }

    /// Selector targeting only the given identifiers
    pub fn only(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the selector carries no explicit ids (default-to-all)
    pub fn is_all(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when `id` is explicitly selected
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Whether `id` falls inside this run's effective set
    pub fn targets(&self, id: &str) -> bool {
        self.is_all() || self.contains(id)
    }

    /// Explicitly selected ids, in sorted order (empty when default-to-all)
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for DestinationSelector {
    fn from(ids: Vec<String>) -> Self {
        Self::only(ids)
    }
}
