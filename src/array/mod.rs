//! VersionedArray - Partially persistent growable array
//!
//! Storage layout:
//! - one `VersionedSlot<T>` per index, indices stable once assigned
//! - one `VersionedSlot<usize>` holding the length at every version
//! - the lineage's version counter
//!
//! A `VersionedArray` value is a view: shared storage plus the version it
//! reads at. Reads take the storage read lock. Mutations take the write lock
//! for the whole "stage, append, publish" unit, so a reader never observes a
//! published version whose entries are missing.

mod iter;

pub use iter::Iter;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::HistoryConfig;
use crate::errors::{CollectionError, CollectionResult, ConfigError};
use crate::observability::MetricsSnapshot;
use crate::version::{Lineage, LineageId, VersionId, VersionedSlot};
use crate::versionable::Versionable;

struct ArrayBody<T> {
    slots: Vec<VersionedSlot<T>>,
    size: VersionedSlot<usize>,
}

impl<T> ArrayBody<T> {
    fn len_at(&self, version: VersionId) -> usize {
        self.size.get(version).unwrap_or(0)
    }
}

struct ArrayStore<T> {
    lineage: Lineage,
    body: RwLock<ArrayBody<T>>,
}

impl<T> ArrayStore<T> {
    fn read(&self) -> RwLockReadGuard<'_, ArrayBody<T>> {
        self.body.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ArrayBody<T>> {
        self.body.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A view of a partially persistent array.
///
/// Cloning a view is cheap and shares storage. Every mutation returns a new
/// view and leaves `self` reading the version it always read.
pub struct VersionedArray<T> {
    store: Arc<ArrayStore<T>>,
    version: VersionId,
}

impl<T> VersionedArray<T> {
    /// Create an empty array at version 0.
    pub fn new() -> Self {
        Self::from_slots(Vec::new(), &HistoryConfig::default())
    }

    /// Create an empty array with the given storage config.
    ///
    /// Fails with `ConfigError::Invalid` if the config does not validate.
    pub fn with_config(config: HistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_slots(
            Vec::with_capacity(config.initial_capacity),
            &config,
        ))
    }

    fn from_slots(slots: Vec<VersionedSlot<T>>, config: &HistoryConfig) -> Self {
        let size = VersionedSlot::new(VersionId::ZERO, slots.len());
        Self {
            store: Arc::new(ArrayStore {
                lineage: Lineage::new("array", config),
                body: RwLock::new(ArrayBody { slots, size }),
            }),
            version: VersionId::ZERO,
        }
    }

    fn at(&self, version: VersionId) -> Self {
        Self {
            store: Arc::clone(&self.store),
            version,
        }
    }

    /// Number of elements at this view's version.
    pub fn len(&self) -> usize {
        self.store.read().len_at(self.version)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identity of the lineage this view belongs to.
    pub fn lineage_id(&self) -> LineageId {
        self.store.lineage.id()
    }

    /// Operation counters of this lineage.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.store.lineage.metrics()
    }

    /// Replace the element at `index`.
    ///
    /// Fails with `StaleVersion` unless this is the latest view, then with
    /// `IndexOutOfRange` unless `index < len()`. A failed call creates no
    /// version.
    pub fn update(&self, index: usize, value: T) -> CollectionResult<Self> {
        let lineage = &self.store.lineage;
        let body = self.store.write();
        let version = lineage.stage(self.version, "update")?;

        let len = body.len_at(self.version);
        let slot = match body.slots.get(index) {
            Some(slot) if index < len => slot,
            _ => {
                return Err(lineage.reject("update", CollectionError::IndexOutOfRange { index, len }))
            }
        };
        slot.append(version, value);

        lineage.commit(version, "update", 1);
        Ok(self.at(version))
    }

    /// Append an element at the end.
    ///
    /// Fails with `StaleVersion` unless this is the latest view.
    pub fn push_back(&self, value: T) -> CollectionResult<Self> {
        let lineage = &self.store.lineage;
        let mut body = self.store.write();
        let version = lineage.stage(self.version, "push_back")?;

        let len = body.len_at(self.version);
        match body.slots.get(len) {
            Some(slot) => slot.append(version, value),
            None => body.slots.push(VersionedSlot::new(version, value)),
        }
        body.size.append(version, len + 1);

        lineage.commit(version, "push_back", 2);
        Ok(self.at(version))
    }
}

impl<T: Clone> VersionedArray<T> {
    /// Create an array holding `count` copies of `value` at version 0.
    pub fn from_elem(value: T, count: usize) -> Self {
        Self::prefilled(value, count, &HistoryConfig::default())
    }

    /// `from_elem` with the given storage config.
    ///
    /// Fails with `ConfigError::Invalid` if the config does not validate.
    pub fn from_elem_with_config(
        value: T,
        count: usize,
        config: HistoryConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::prefilled(value, count, &config))
    }

    fn prefilled(value: T, count: usize, config: &HistoryConfig) -> Self {
        let mut slots = Vec::with_capacity(count.max(config.initial_capacity));
        slots.extend((0..count).map(|_| VersionedSlot::new(VersionId::ZERO, value.clone())));
        Self::from_slots(slots, config)
    }

    /// Element at `index` as of this view's version.
    ///
    /// Fails with `IndexOutOfRange` unless `index < len()`.
    pub fn get(&self, index: usize) -> CollectionResult<T> {
        let body = self.store.read();
        let len = body.len_at(self.version);
        if index >= len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        body.slots
            .get(index)
            .ok_or(CollectionError::NotFound {
                version: self.version,
            })?
            .get(self.version)
    }

    /// Elements in index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Copy of all elements at this view's version.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Clone + Default> VersionedArray<T> {
    /// Create an array holding `count` default values at version 0.
    pub fn with_len(count: usize) -> Self {
        Self::from_elem(T::default(), count)
    }
}

impl<T> Default for VersionedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VersionedArray<T> {
    fn clone(&self) -> Self {
        self.at(self.version)
    }
}

impl<T> Versionable for VersionedArray<T> {
    fn version(&self) -> VersionId {
        self.version
    }

    fn latest_version(&self) -> VersionId {
        self.store.lineage.latest()
    }

    fn undo(&self) -> Self {
        self.at(self.store.lineage.undo_target(self.version))
    }

    fn redo(&self) -> Self {
        self.at(self.store.lineage.redo_target(self.version))
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for VersionedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedArray")
            .field("version", &self.version)
            .field("elements", &self.to_vec())
            .finish()
    }
}
