//! Slot Visibility Tests
//!
//! Tests for the fat-node lookup rule:
//! - newest entry at or below the requested version wins
//! - a tombstone seals the element; older live entries are not consulted

use pdc::{CollectionError, VersionId, VersionedSlot};

fn v(n: u64) -> VersionId {
    VersionId::new(n)
}

// =============================================================================
// Lookup Rule Tests
// =============================================================================

/// Lookup selects the newest entry at or below the requested version.
#[test]
fn test_lookup_newest_within_bound() {
    let slot = VersionedSlot::new(v(1), "v1");
    slot.append(v(5), "v5");
    slot.append(v(10), "v10");

    assert_eq!(slot.get(v(7)).unwrap(), "v5");
    assert_eq!(slot.get(v(10)).unwrap(), "v10");
}

/// Versions before the first entry see nothing.
#[test]
fn test_all_future_not_found() {
    let slot = VersionedSlot::new(v(10), 1);
    slot.append(v(20), 2);

    assert_eq!(slot.get(v(5)), Err(CollectionError::NotFound { version: v(5) }));
    assert!(!slot.has_value(v(5)));
}

// =============================================================================
// Tombstone Tests
// =============================================================================

/// A tombstone hides every older entry from its version on.
#[test]
fn test_tombstone_hides_older() {
    let slot = VersionedSlot::new(v(1), "old");
    slot.append(v(3), "newer");
    assert!(slot.mark_deleted(v(5)));

    assert!(slot.get(v(5)).unwrap_err().is_not_found());
    assert!(slot.get(v(50)).unwrap_err().is_not_found());
}

/// A version before the tombstone still reads its value.
#[test]
fn test_view_before_tombstone_sees_data() {
    let slot = VersionedSlot::new(v(3), "visible");
    slot.mark_deleted(v(10));

    assert_eq!(slot.get(v(5)).unwrap(), "visible");
    assert!(slot.has_value(v(9)));
}

/// A value appended after a tombstone is visible from its own version.
#[test]
fn test_delete_then_reinsert() {
    let slot = VersionedSlot::new(v(1), "original");
    slot.mark_deleted(v(5));
    slot.append(v(10), "reinserted");

    assert_eq!(slot.get(v(1)).unwrap(), "original");
    assert!(slot.get(v(7)).is_err());
    assert_eq!(slot.get(v(12)).unwrap(), "reinserted");
}

/// Deleting where nothing is visible changes nothing.
#[test]
fn test_delete_without_value_is_noop() {
    let slot = VersionedSlot::new(v(4), 0);
    assert!(!slot.mark_deleted(v(2)));
    assert_eq!(slot.history_len(), 1);
}

// =============================================================================
// Stability Tests
// =============================================================================

/// Repeated lookups at one version agree, whatever is appended later.
#[test]
fn test_same_version_same_result() {
    let slot = VersionedSlot::new(v(1), 'a');
    let first = slot.get(v(1));

    slot.append(v(2), 'b');
    slot.mark_deleted(v(3));

    assert_eq!(slot.get(v(1)), first);
}
