//! VersionedSlot - Append-only value history of one element
//!
//! Lookup rule for a slot and a version `V`:
//! 1. Consider only entries with `entry.version <= V`
//! 2. Take the newest of them
//! 3. If that entry is a tombstone, there is no value at `V`
//!
//! The scan stops at the first qualifying entry. A tombstone seals the
//! element from its version onward; older live entries are NOT consulted.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::VersionId;
use crate::errors::{CollectionError, CollectionResult};

/// One entry of a slot's history.
///
/// `value` is `None` for a tombstone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry<T> {
    pub version: VersionId,
    pub value: Option<T>,
}

impl<T> SlotEntry<T> {
    /// Returns true if this entry marks a deletion.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }
}

/// The full value history of one logical element.
///
/// Every method takes the slot's own lock, so a slot may be read from any
/// thread holding a handle to the storage that owns it.
#[derive(Debug)]
pub struct VersionedSlot<T> {
    entries: Mutex<Vec<SlotEntry<T>>>,
}

impl<T> VersionedSlot<T> {
    /// Create a slot with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Create a slot holding `value` from `version` onward.
    pub fn new(version: VersionId, value: T) -> Self {
        Self {
            entries: Mutex::new(vec![SlotEntry {
                version,
                value: Some(value),
            }]),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SlotEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Newest entry with `entry.version <= version`, tombstones included.
    fn qualifying(entries: &[SlotEntry<T>], version: VersionId) -> Option<&SlotEntry<T>> {
        entries.iter().rev().find(|entry| entry.version <= version)
    }

    /// Returns true if a live value is visible at `version`.
    pub fn has_value(&self, version: VersionId) -> bool {
        let entries = self.lock();
        matches!(Self::qualifying(&entries, version), Some(entry) if !entry.is_tombstone())
    }

    /// Appends a live entry.
    ///
    /// `version` must be greater than every version already in the slot.
    pub fn append(&self, version: VersionId, value: T) {
        let mut entries = self.lock();
        debug_assert!(entries.last().map_or(true, |last| last.version < version));
        entries.push(SlotEntry {
            version,
            value: Some(value),
        });
    }

    /// Appends a tombstone at `version` if a value is visible there.
    ///
    /// Returns true if a tombstone was appended. A slot with nothing
    /// visible at `version` is left untouched.
    pub fn mark_deleted(&self, version: VersionId) -> bool {
        let mut entries = self.lock();
        let visible = matches!(
            Self::qualifying(&entries, version),
            Some(entry) if !entry.is_tombstone()
        );
        if !visible {
            return false;
        }
        debug_assert!(entries.last().map_or(true, |last| last.version < version));
        entries.push(SlotEntry {
            version,
            value: None,
        });
        true
    }

    /// Number of entries ever appended, tombstones included.
    pub fn history_len(&self) -> usize {
        self.lock().len()
    }

    /// Version of the newest entry, if any.
    pub fn latest_version(&self) -> Option<VersionId> {
        self.lock().last().map(|entry| entry.version)
    }
}

impl<T: Clone> VersionedSlot<T> {
    /// Returns the value visible at `version`.
    ///
    /// Fails with `NotFound` if no entry qualifies or if the qualifying
    /// entry is a tombstone.
    pub fn get(&self, version: VersionId) -> CollectionResult<T> {
        let entries = self.lock();
        Self::qualifying(&entries, version)
            .and_then(|entry| entry.value.clone())
            .ok_or(CollectionError::NotFound { version })
    }

    /// Copy of the whole history, oldest first.
    pub fn entries(&self) -> Vec<SlotEntry<T>> {
        self.lock().clone()
    }
}
