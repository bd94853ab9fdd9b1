//! Array History Tests
//!
//! Tests for VersionedArray across versions:
//! - size and contents per version
//! - undo/redo as inverse moves along one version line
//! - mutation only from the latest view

use pdc::config::MAX_INITIAL_CAPACITY;
use pdc::{CollectionError, ConfigError, HistoryConfig, VersionId, Versionable, VersionedArray};

// =============================================================================
// Growth Tests
// =============================================================================

/// After n pushes the array has n elements in insertion order.
#[test]
fn test_n_pushes() {
    for n in [0usize, 1, 2, 17, 256] {
        let array = (0..n).fold(VersionedArray::new(), |a, i| a.push_back(i).unwrap());
        assert_eq!(array.len(), n);
        for i in 0..n {
            assert_eq!(array.get(i).unwrap(), i);
        }
        assert_eq!(array.version(), VersionId::new(n as u64));
    }
}

/// Pre-filled arrays start at version 0.
#[test]
fn test_prefilled_array() {
    let array = VersionedArray::from_elem(7u8, 3);
    assert_eq!(array.to_vec(), vec![7, 7, 7]);
    assert_eq!(array.version(), VersionId::ZERO);

    let defaults: VersionedArray<String> = VersionedArray::with_len(2);
    assert_eq!(defaults.to_vec(), vec![String::new(), String::new()]);
}

// =============================================================================
// Undo / Redo Tests
// =============================================================================

/// Undo after a mutation reproduces the previous state exactly.
#[test]
fn test_undo_reproduces_previous_state() {
    let v1 = VersionedArray::new().push_back(1).unwrap().push_back(2).unwrap();
    let v2 = v1.update(1, 20).unwrap();
    let v3 = v2.push_back(3).unwrap();

    assert_eq!(v3.undo().to_vec(), v2.to_vec());
    assert_eq!(v2.undo().to_vec(), v1.to_vec());
    assert_eq!(v3.undo().undo().len(), v1.len());
}

/// Undo then redo returns to the same version.
#[test]
fn test_undo_redo_round_trip() {
    let array = VersionedArray::new().push_back('a').unwrap().push_back('b').unwrap();
    let back = array.undo().redo();

    assert_eq!(back.version(), array.version());
    assert_eq!(back.to_vec(), array.to_vec());
}

/// Undo and redo clamp at the ends of the history.
#[test]
fn test_undo_redo_clamp() {
    let array = VersionedArray::new().push_back(1).unwrap();
    assert_eq!(array.undo_n(10).version(), VersionId::ZERO);
    assert_eq!(array.redo_n(10).version(), VersionId::new(1));
}

/// Two views of one lineage read independently.
#[test]
fn test_views_read_independently() {
    let empty = VersionedArray::new();
    let a = empty.push_back(0).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a.get(0).unwrap(), 0);

    let b = a.update(0, 1).unwrap();
    assert_eq!(b.len(), 1);
    assert_eq!(b.get(0).unwrap(), 1);

    // Undo on a view never touches another view
    let a_undone = a.undo();
    assert!(a_undone.is_empty());
    assert_eq!(a.get(0).unwrap(), 0);
    assert_eq!(b.get(0).unwrap(), 1);
}

// =============================================================================
// Mutation Exclusivity Tests
// =============================================================================

/// Mutating an undone view fails and leaves the history unchanged.
#[test]
fn test_mutating_undone_view_is_stale() {
    let latest = VersionedArray::new().push_back(1).unwrap().push_back(2).unwrap();
    let undone = latest.undo();

    let err = undone.update(0, 100).unwrap_err();
    assert_eq!(
        err,
        CollectionError::StaleVersion {
            view: VersionId::new(1),
            latest: VersionId::new(2),
        }
    );
    assert!(undone.push_back(3).is_err());

    assert_eq!(latest.latest_version(), VersionId::new(2));
    assert_eq!(latest.to_vec(), vec![1, 2]);
    assert_eq!(latest.metrics().stale_rejections, 2);
}

/// An out-of-range update fails without bumping the version.
#[test]
fn test_out_of_range_update_no_bump() {
    let array = VersionedArray::from_elem(0, 2);
    assert_eq!(
        array.update(2, 1).unwrap_err(),
        CollectionError::IndexOutOfRange { index: 2, len: 2 }
    );
    assert_eq!(array.latest_version(), VersionId::ZERO);
    assert!(array.is_latest());
}

/// The latest view recovers from a stale rejection.
#[test]
fn test_recover_through_latest() {
    let v1 = VersionedArray::new().push_back(1).unwrap();
    let _v2 = v1.push_back(2).unwrap();

    let err = v1.push_back(3).unwrap_err();
    assert!(err.is_recoverable());

    let v3 = v1.latest().push_back(3).unwrap();
    assert_eq!(v3.to_vec(), vec![1, 2, 3]);
}

// =============================================================================
// Config Tests
// =============================================================================

/// Metrics can be switched off per lineage.
#[test]
fn test_metrics_disabled() {
    let array = VersionedArray::with_config(HistoryConfig::default().without_metrics()).unwrap();
    let array = array.push_back(1).unwrap();
    assert_eq!(array.metrics().commits, 0);
}

/// A labeled lineage with capacity behaves like any other.
#[test]
fn test_labeled_config() {
    let config = HistoryConfig::from_json_str(r#"{"label":"scores","initial_capacity":8}"#).unwrap();
    let array = VersionedArray::with_config(config)
        .unwrap()
        .push_back(5)
        .unwrap();
    assert_eq!(array.to_vec(), vec![5]);
    assert_eq!(array.metrics().commits, 1);
    assert_eq!(array.metrics().slot_appends, 2);
}

/// A builder-made config with an oversized capacity is rejected, not allocated.
#[test]
fn test_oversized_capacity_rejected() {
    let config = HistoryConfig::default().with_capacity(MAX_INITIAL_CAPACITY + 1);
    let err = VersionedArray::<u64>::with_config(config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "initial_capacity", .. }));

    let config = HistoryConfig::default().with_capacity(usize::MAX);
    assert!(VersionedArray::from_elem_with_config(1u64, 3, config).is_err());
}
