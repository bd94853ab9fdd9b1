//! Undo/Redo over a lineage's version line
//!
//! Every container view implements `Versionable` on its own. Moving along
//! the version line never touches storage or the version counter and never
//! fails: undo clamps at version 0, redo clamps at the latest version.

use crate::version::VersionId;

/// A view that can step backward and forward through its history.
pub trait Versionable: Clone {
    /// Version this view reads at.
    fn version(&self) -> VersionId;

    /// Latest version of the lineage this view belongs to.
    fn latest_version(&self) -> VersionId;

    /// View one version back, or the same version at version 0.
    fn undo(&self) -> Self;

    /// View one version forward, or the same version at the latest.
    fn redo(&self) -> Self;

    /// Whether this view may mutate.
    fn is_latest(&self) -> bool {
        self.version() == self.latest_version()
    }

    /// The latest view of this lineage.
    ///
    /// This is how a caller recovers from `StaleVersion`. The latest version
    /// can move while this runs; the result is the latest one observed.
    fn latest(&self) -> Self {
        let mut view = self.clone();
        while !view.is_latest() {
            view = view.redo();
        }
        view
    }

    /// Undo `n` times.
    fn undo_n(&self, n: usize) -> Self {
        (0..n).fold(self.clone(), |view, _| view.undo())
    }

    /// Redo `n` times.
    fn redo_n(&self, n: usize) -> Self {
        (0..n).fold(self.clone(), |view, _| view.redo())
    }
}
