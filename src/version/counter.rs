//! VersionCounter - Latest committed version of a lineage
//!
//! - Starts at version 0
//! - Only ever incremented, and only by a successful mutation
//! - Shared by every view descended from one constructor call
//!
//! A mutation is a two-step protocol run under the container write lock:
//! `stage` rejects stale views and names the pending version, `publish`
//! makes it the latest once every entry of the mutation is appended.

use std::sync::atomic::{AtomicU64, Ordering};

use super::VersionId;
use crate::errors::{CollectionError, CollectionResult};

/// Monotonic version counter for one lineage.
#[derive(Debug, Default)]
pub struct VersionCounter {
    latest: AtomicU64,
}

impl VersionCounter {
    /// Create a counter at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest committed version.
    pub fn current(&self) -> VersionId {
        VersionId::new(self.latest.load(Ordering::Acquire))
    }

    /// Check that `view` is the latest version and return the version the
    /// pending mutation will commit as.
    ///
    /// The caller must hold the container write lock until `publish`.
    pub fn stage(&self, view: VersionId) -> CollectionResult<VersionId> {
        let latest = self.current();
        if view != latest {
            return Err(CollectionError::StaleVersion { view, latest });
        }
        Ok(latest.next())
    }

    /// Make a staged version the latest.
    ///
    /// Entries written at `version` must already be appended.
    pub fn publish(&self, version: VersionId) {
        debug_assert_eq!(version, self.current().next());
        self.latest.store(version.value(), Ordering::Release);
    }
}
