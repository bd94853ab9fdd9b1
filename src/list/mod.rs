//! VersionedList - Partially persistent doubly-linked list
//!
//! Unlike the array and map, list nodes carry no value history: a node is
//! created once, tagged with its insertion version, and can only be
//! soft-deleted. Old views keep seeing deleted nodes; new nodes are
//! invisible to views older than their insertion.
//!
//! # Locking
//!
//! Two levels, always acquired in this order:
//! 1. the container lock (`RwLock`), held in write mode for the whole
//!    "stage, splice or delete, publish" unit of a mutation and in read mode
//!    by every traversal step
//! 2. a node's own lock, taken to read or set its deletion state

mod cursor;
mod node;

pub use cursor::{Cursor, Iter, Position};

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use self::node::{Anchor, ListBody};
use crate::config::HistoryConfig;
use crate::errors::{CollectionError, CollectionResult, ConfigError};
use crate::observability::MetricsSnapshot;
use crate::version::{Lineage, LineageId, VersionId};
use crate::versionable::Versionable;

struct ListStore<T> {
    lineage: Lineage,
    body: RwLock<ListBody<T>>,
}

impl<T> ListStore<T> {
    fn read(&self) -> RwLockReadGuard<'_, ListBody<T>> {
        self.body.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListBody<T>> {
        self.body.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A view of a partially persistent doubly-linked list.
///
/// Cloning a view is cheap and shares storage. Every mutation returns a new
/// view and leaves `self` reading the version it always read.
pub struct VersionedList<T> {
    store: Arc<ListStore<T>>,
    version: VersionId,
}

impl<T> VersionedList<T> {
    /// Create an empty list at version 0.
    pub fn new() -> Self {
        Self::from_config(&HistoryConfig::default())
    }

    /// Create an empty list with the given storage config.
    ///
    /// Fails with `ConfigError::Invalid` if the config does not validate.
    pub fn with_config(config: HistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(&config))
    }

    fn from_config(config: &HistoryConfig) -> Self {
        Self {
            store: Arc::new(ListStore {
                lineage: Lineage::new("list", config),
                body: RwLock::new(ListBody::with_capacity(config.initial_capacity)),
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

    /// Number of elements at this view's version. O(n).
    pub fn len(&self) -> usize {
        self.store.read().count_visible(self.version)
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().first_visible(self.version).is_none()
    }

    /// Identity of the lineage this view belongs to.
    pub fn lineage_id(&self) -> LineageId {
        self.store.lineage.id()
    }

    /// Operation counters of this lineage.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.store.lineage.metrics()
    }

    /// Cursor on the first element (the end if empty).
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        let first = self.store.read().first_visible(self.version);
        Cursor::new(self, first)
    }

    /// Cursor on the last element (the end if empty).
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        let last = self.store.read().last_visible(self.version);
        Cursor::new(self, last)
    }

    /// Cursor on the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, None)
    }

    /// Elements front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Append an element at the back.
    pub fn push_back(&self, value: T) -> CollectionResult<Self> {
        self.splice("push_back", value, |_| Ok(Anchor::Back))
    }

    /// Prepend an element at the front.
    pub fn push_front(&self, value: T) -> CollectionResult<Self> {
        self.splice("push_front", value, |_| Ok(Anchor::Front))
    }

    /// Insert an element before `position`; the end position appends.
    ///
    /// Fails with `StaleVersion` unless this is the latest view, then with
    /// `InvalidPosition` unless `position` is the end or an element visible
    /// at the latest version.
    pub fn insert(&self, position: Position, value: T) -> CollectionResult<Self> {
        self.splice("insert", value, |body| match self.live_node(body, position)? {
            Some(index) => Ok(Anchor::Before(index)),
            None => Ok(Anchor::Back),
        })
    }

    /// Soft-delete the element at `position`.
    ///
    /// Views older than the returned one keep seeing the element. Fails
    /// with `StaleVersion` unless this is the latest view, then with
    /// `InvalidPosition` unless `position` names an element visible at the
    /// latest version.
    pub fn remove(&self, position: Position) -> CollectionResult<Self> {
        let lineage = &self.store.lineage;
        let body = self.store.write();
        let version = lineage.stage(self.version, "remove")?;

        let index = self
            .live_node(&body, position)
            .and_then(|node| node.ok_or(CollectionError::InvalidPosition))
            .map_err(|err| lineage.reject("remove", err))?;
        if let Some(node) = body.node(index) {
            node.mark_deleted(version);
        }

        lineage.commit(version, "remove", 1);
        Ok(self.at(version))
    }

    /// Resolve a position against this (latest) view.
    ///
    /// `Ok(None)` is the end position.
    fn live_node(&self, body: &ListBody<T>, position: Position) -> CollectionResult<Option<usize>> {
        if position.lineage != self.lineage_id() {
            return Err(CollectionError::InvalidPosition);
        }
        match position.node {
            None => Ok(None),
            Some(index) => match body.node(index) {
                Some(node) if node.is_visible_at(self.version) => Ok(Some(index)),
                _ => Err(CollectionError::InvalidPosition),
            },
        }
    }

    fn splice<F>(&self, op: &'static str, value: T, anchor: F) -> CollectionResult<Self>
    where
        F: FnOnce(&ListBody<T>) -> CollectionResult<Anchor>,
    {
        let lineage = &self.store.lineage;
        let mut body = self.store.write();
        let version = lineage.stage(self.version, op)?;

        let anchor = anchor(&*body).map_err(|err| lineage.reject(op, err))?;
        body.link(anchor, value, version);

        lineage.commit(version, op, 1);
        Ok(self.at(version))
    }
}

impl<T: Clone> VersionedList<T> {
    /// First element, if any.
    pub fn front(&self) -> Option<T> {
        self.cursor_front().current()
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<T> {
        self.cursor_back().current()
    }

    /// Copy of all elements at this view's version.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T> Default for VersionedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VersionedList<T> {
    fn clone(&self) -> Self {
        self.at(self.version)
    }
}

impl<T> Versionable for VersionedList<T> {
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

impl<T: Clone + fmt::Debug> fmt::Debug for VersionedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedList")
            .field("version", &self.version)
            .field("elements", &self.to_vec())
            .finish()
    }
}
