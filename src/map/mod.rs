//! VersionedMap - Partially persistent ordered map
//!
//! Storage layout:
//! - `BTreeMap<K, VersionedSlot<V>>`: a key, once inserted, stays in the
//!   tree forever; only its slot's visibility changes between versions
//! - one `VersionedSlot<usize>` holding the number of visible keys at every
//!   version, so `len` does not scan
//! - the lineage's version counter
//!
//! Two lookups can come back empty and they are reported differently:
//! a key that was never inserted fails with `UnknownKey` (there is no slot
//! to ask), a key with no live value at the view's version fails with
//! `NotFound`.

mod iter;

pub use iter::Iter;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::HistoryConfig;
use crate::errors::{CollectionError, CollectionResult, ConfigError};
use crate::observability::MetricsSnapshot;
use crate::version::{Lineage, LineageId, VersionId, VersionedSlot};
use crate::versionable::Versionable;

struct MapBody<K, V> {
    entries: BTreeMap<K, VersionedSlot<V>>,
    size: VersionedSlot<usize>,
}

impl<K, V> MapBody<K, V> {
    fn len_at(&self, version: VersionId) -> usize {
        self.size.get(version).unwrap_or(0)
    }
}

struct MapStore<K, V> {
    lineage: Lineage,
    body: RwLock<MapBody<K, V>>,
}

impl<K, V> MapStore<K, V> {
    fn read(&self) -> RwLockReadGuard<'_, MapBody<K, V>> {
        self.body.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MapBody<K, V>> {
        self.body.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A view of a partially persistent ordered map.
///
/// Cloning a view is cheap and shares storage. Every mutation returns a new
/// view and leaves `self` reading the version it always read.
pub struct VersionedMap<K, V> {
    store: Arc<MapStore<K, V>>,
    version: VersionId,
}

impl<K: Ord, V> VersionedMap<K, V> {
    /// Create an empty map at version 0.
    pub fn new() -> Self {
        Self::from_config(&HistoryConfig::default())
    }

    /// Create an empty map with the given storage config.
    ///
    /// `initial_capacity` is validated but otherwise ignored: the tree
    /// allocates per node.
    pub fn with_config(config: HistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(&config))
    }

    fn from_config(config: &HistoryConfig) -> Self {
        Self {
            store: Arc::new(MapStore {
                lineage: Lineage::new("map", config),
                body: RwLock::new(MapBody {
                    entries: BTreeMap::new(),
                    size: VersionedSlot::new(VersionId::ZERO, 0),
                }),
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

    /// Number of keys with a live value at this view's version.
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

    /// Whether `key` has a live value at this view's version.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.store
            .read()
            .entries
            .get(key)
            .map_or(false, |slot| slot.has_value(self.version))
    }

    /// Set `key` to `value` in a new version.
    ///
    /// Earlier versions keep reading the value they had. Fails with
    /// `StaleVersion` unless this is the latest view.
    pub fn insert(&self, key: K, value: V) -> CollectionResult<Self> {
        let lineage = &self.store.lineage;
        let mut body = self.store.write();
        let version = lineage.stage(self.version, "insert")?;

        let was_visible = match body.entries.get(&key) {
            Some(slot) => {
                let visible = slot.has_value(self.version);
                slot.append(version, value);
                visible
            }
            None => {
                body.entries.insert(key, VersionedSlot::new(version, value));
                false
            }
        };

        let mut appended = 1;
        if !was_visible {
            let len = body.len_at(self.version);
            body.size.append(version, len + 1);
            appended += 1;
        }

        lineage.commit(version, "insert", appended);
        Ok(self.at(version))
    }

    /// Delete `key` in a new version.
    ///
    /// Fails with `StaleVersion` unless this is the latest view, with
    /// `UnknownKey` if the key was never inserted, and with `NotFound` if it
    /// has no live value at the latest version.
    pub fn remove<Q>(&self, key: &Q) -> CollectionResult<Self>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let lineage = &self.store.lineage;
        let body = self.store.write();
        let version = lineage.stage(self.version, "remove")?;

        let slot = body
            .entries
            .get(key)
            .ok_or_else(|| lineage.reject("remove", CollectionError::UnknownKey))?;
        if !slot.mark_deleted(version) {
            return Err(lineage.reject(
                "remove",
                CollectionError::NotFound {
                    version: self.version,
                },
            ));
        }
        let len = body.len_at(self.version);
        body.size.append(version, len.saturating_sub(1));

        lineage.commit(version, "remove", 2);
        Ok(self.at(version))
    }
}

impl<K: Ord, V: Clone> VersionedMap<K, V> {
    /// Value of `key` at this view's version.
    pub fn get<Q>(&self, key: &Q) -> CollectionResult<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.store
            .read()
            .entries
            .get(key)
            .ok_or(CollectionError::UnknownKey)?
            .get(self.version)
    }
}

impl<K: Ord + Clone, V: Clone> VersionedMap<K, V> {
    /// Visible `(key, value)` pairs in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Visible keys in order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

impl<K: Ord, V> Default for VersionedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for VersionedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            version: self.version,
        }
    }
}

impl<K, V> Versionable for VersionedMap<K, V> {
    fn version(&self) -> VersionId {
        self.version
    }

    fn latest_version(&self) -> VersionId {
        self.store.lineage.latest()
    }

    fn undo(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            version: self.store.lineage.undo_target(self.version),
        }
    }

    fn redo(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            version: self.store.lineage.redo_target(self.version),
        }
    }
}

impl<K, V> fmt::Debug for VersionedMap<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedMap")
            .field("version", &self.version)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a VersionedMap<K, V>);

impl<K, V> fmt::Debug for DebugEntries<'_, K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
