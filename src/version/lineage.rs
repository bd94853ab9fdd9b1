//! Lineage - One linear version history shared by many views
//!
//! A lineage is created by a container constructor and shared, through the
//! container's storage, by every view derived from it. It owns the version
//! counter and reports commits and rejections to the log and the metrics.

use std::fmt;

use uuid::Uuid;

use super::{VersionCounter, VersionId};
use crate::config::HistoryConfig;
use crate::errors::{CollectionError, CollectionResult};
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot};

/// Random identity of one lineage.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LineageId(Uuid);

impl LineageId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version history bookkeeping of one storage.
#[derive(Debug)]
pub struct Lineage {
    id: LineageId,
    kind: &'static str,
    label: Option<String>,
    counter: VersionCounter,
    metrics: MetricsRegistry,
}

impl Lineage {
    /// Create a lineage at version 0 for a container of the given kind.
    pub fn new(kind: &'static str, config: &HistoryConfig) -> Self {
        let lineage = Self {
            id: LineageId::generate(),
            kind,
            label: config.label.clone(),
            counter: VersionCounter::new(),
            metrics: MetricsRegistry::new(config.metrics_enabled),
        };
        lineage.log(Event::LineageCreated, &[]);
        lineage
    }

    pub fn id(&self) -> LineageId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The latest committed version.
    pub fn latest(&self) -> VersionId {
        self.counter.current()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Target of an undo from `view`: one version back, clamped at zero.
    pub fn undo_target(&self, view: VersionId) -> VersionId {
        view.prev_saturating()
    }

    /// Target of a redo from `view`: one version forward, clamped at the latest.
    pub fn redo_target(&self, view: VersionId) -> VersionId {
        view.next().min(self.latest())
    }

    /// Begin a mutation from `view`.
    ///
    /// Returns the version the mutation commits as. The caller must hold the
    /// container write lock from here until `commit`.
    pub fn stage(&self, view: VersionId, op: &'static str) -> CollectionResult<VersionId> {
        self.counter.stage(view).map_err(|err| self.reject(op, err))
    }

    /// Record a rejected mutation and hand the error back.
    pub fn reject(&self, op: &'static str, err: CollectionError) -> CollectionError {
        match err {
            CollectionError::StaleVersion { .. } => self.metrics.increment_stale_rejections(),
            _ => self.metrics.increment_range_rejections(),
        }
        if Logger::enabled(Event::MutationRejected.severity()) {
            self.log(
                Event::MutationRejected,
                &[("op", op), ("code", err.code()), ("reason", err.to_string().as_str())],
            );
        }
        err
    }

    /// Publish a staged version once its `appended` slot entries are written.
    pub fn commit(&self, version: VersionId, op: &'static str, appended: u64) {
        self.counter.publish(version);
        self.metrics.record_commit(appended);
        if Logger::enabled(Event::VersionCommitted.severity()) {
            self.log(
                Event::VersionCommitted,
                &[("op", op), ("version", version.value().to_string().as_str())],
            );
        }
    }

    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        if !Logger::enabled(event.severity()) {
            return;
        }
        let id = self.id.to_string();
        let mut all: Vec<(&str, &str)> = vec![("lineage", id.as_str()), ("kind", self.kind)];
        if let Some(label) = self.label.as_deref() {
            all.push(("label", label));
        }
        all.extend_from_slice(fields);
        Logger::log(event.severity(), event.as_str(), &all);
    }
}
