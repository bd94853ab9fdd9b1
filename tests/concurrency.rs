//! Concurrency Tests
//!
//! Views are shared across threads:
//! - of two racing latest views exactly one mutation wins
//! - readers of committed versions never observe later writes
//! - a reader never sees a version whose entries are missing

use std::sync::{Arc, Barrier};
use std::thread;

use pdc::{
    CollectionError, CollectionResult, VersionId, Versionable, VersionedArray, VersionedList,
    VersionedMap,
};

fn assert_send_sync<T: Send + Sync>() {}

/// Views of every container can cross thread boundaries.
#[test]
fn test_views_are_send_sync() {
    assert_send_sync::<VersionedArray<String>>();
    assert_send_sync::<VersionedList<String>>();
    assert_send_sync::<VersionedMap<String, Vec<u8>>>();
}

// =============================================================================
// Mutation Race Tests
// =============================================================================

/// Run `mutate` on two clones of `view` released together by a barrier.
fn race_two<V, F>(view: &V, mutate: F) -> Vec<CollectionResult<V>>
where
    V: Versionable + Send + 'static,
    F: Fn(&V, u32) -> CollectionResult<V> + Copy + Send + 'static,
{
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (1..=2u32)
        .map(|value| {
            let view = view.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                mutate(&view, value)
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

/// Exactly one result committed `expected`; the other is stale against it.
fn single_winner<V: Versionable>(results: Vec<CollectionResult<V>>, expected: VersionId) -> V {
    assert!(results.iter().any(|r| matches!(
        r,
        Err(CollectionError::StaleVersion { latest, .. }) if *latest == expected
    )));
    let mut winners: Vec<V> = results.into_iter().filter_map(Result::ok).collect();
    assert_eq!(winners.len(), 1);
    let winner = winners.remove(0);
    assert_eq!(winner.version(), expected);
    winner
}

/// Two threads update the same latest array view; one commits, one is stale.
#[test]
fn test_racing_array_writers_one_wins() {
    for _ in 0..50 {
        let array = VersionedArray::from_elem(0u32, 4);
        let results = race_two(&array, |view, value| view.update(0, value));
        let winner = single_winner(results, VersionId::new(1));

        assert!(winner.get(0).unwrap() > 0);
        assert_eq!(array.get(0).unwrap(), 0);
        assert_eq!(array.metrics().stale_rejections, 1);
    }
}

/// Two threads push onto the same latest list view; one element lands.
#[test]
fn test_racing_list_writers_one_wins() {
    for _ in 0..50 {
        let list = VersionedList::new().push_back(0u32).unwrap();
        let results = race_two(&list, |view, value| view.push_back(value));
        let winner = single_winner(results, VersionId::new(2));

        assert_eq!(winner.len(), 2);
        assert_eq!(list.to_vec(), vec![0]);
        assert_eq!(list.metrics().stale_rejections, 1);
    }
}

/// Two threads insert into the same latest map view; one key lands.
#[test]
fn test_racing_map_writers_one_wins() {
    for _ in 0..50 {
        let map = VersionedMap::<u32, u32>::new();
        let results = race_two(&map, |view, value| view.insert(value, value));
        let winner = single_winner(results, VersionId::new(1));

        assert_eq!(winner.len(), 1);
        assert_eq!(winner.keys().count(), 1);
        assert!(map.is_empty());
        assert_eq!(map.metrics().stale_rejections, 1);
        assert_eq!(map.metrics().commits, 1);
    }
}

/// Writers chaining from their own results serialize into one history.
#[test]
fn test_map_writers_retry_from_latest() {
    let map = VersionedMap::<u32, u32>::new();
    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let mut view = map.clone();
            thread::spawn(move || {
                for i in 0..25u32 {
                    loop {
                        match view.insert(t * 100 + i, i) {
                            Ok(next) => {
                                view = next;
                                break;
                            }
                            Err(CollectionError::StaleVersion { .. }) => view = view.latest(),
                            Err(other) => panic!("unexpected error: {other}"),
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let latest = map.latest();
    assert_eq!(latest.version(), VersionId::new(100));
    assert_eq!(latest.len(), 100);
    assert_eq!(latest.metrics().commits, 100);
}

// =============================================================================
// Reader Isolation Tests
// =============================================================================

/// Readers of an old version see the same contents while a writer appends.
#[test]
fn test_readers_isolated_from_writer() {
    let base = (0..8).fold(VersionedList::new(), |l, v| l.push_back(v).unwrap());
    let expected = base.to_vec();

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let view = base.clone();
            let expected = expected.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    assert_eq!(view.to_vec(), expected);
                }
            })
        })
        .collect();

    let mut writer = base.clone();
    for v in 100..200 {
        writer = writer.push_front(v).unwrap();
        writer = writer.remove(writer.cursor_back().position()).unwrap();
    }
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(writer.len(), 8);
    assert_eq!(base.to_vec(), expected);
}

/// A reader following the latest version always finds it fully written.
#[test]
fn test_latest_is_fully_visible() {
    let array = VersionedArray::<u64>::new();
    let observer = array.clone();

    let reader = thread::spawn(move || {
        for _ in 0..500 {
            let latest = observer.latest();
            let len = latest.len();
            assert_eq!(len as u64, latest.version().value());
            for index in 0..len {
                assert_eq!(latest.get(index).unwrap(), index as u64);
            }
        }
    });

    let mut writer = array;
    for i in 0..200u64 {
        writer = writer.push_back(i).unwrap();
    }
    reader.join().unwrap();
}
