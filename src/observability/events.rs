//! Observable events of a version lineage
//!
//! Events are explicit and typed.

use std::fmt;

use super::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Storage for a new lineage was created
    LineageCreated,
    /// A mutation committed a new version
    VersionCommitted,
    /// A mutation was rejected before creating a version
    MutationRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::LineageCreated => "LINEAGE_CREATED",
            Event::VersionCommitted => "VERSION_COMMITTED",
            Event::MutationRejected => "MUTATION_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::LineageCreated | Event::VersionCommitted => Severity::Trace,
            Event::MutationRejected => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
