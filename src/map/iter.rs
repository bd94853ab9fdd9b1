//! Key-order iteration over one map version

use std::iter::FusedIterator;
use std::ops::Bound;

use super::VersionedMap;

/// Iterator over the visible `(key, value)` pairs of a `VersionedMap` view.
///
/// Lazy: each step takes the storage lock, resumes the tree walk after the
/// last key it returned and skips keys with no live value at the view's
/// version.
pub struct Iter<'a, K, V> {
    map: &'a VersionedMap<K, V>,
    front: Bound<K>,
    back: Bound<K>,
    done: bool,
}

impl<'a, K: Ord + Clone, V: Clone> Iter<'a, K, V> {
    pub(super) fn new(map: &'a VersionedMap<K, V>) -> Self {
        Self {
            map,
            front: Bound::Unbounded,
            back: Bound::Unbounded,
            done: false,
        }
    }

    fn step(&mut self, forward: bool) -> Option<(K, V)> {
        if self.done {
            return None;
        }
        let version = self.map.version;
        let body = self.map.store.read();
        let mut range = body
            .entries
            .range::<K, _>((self.front.clone(), self.back.clone()));
        let found = if forward {
            range.find_map(|(key, slot)| Some((key, slot.get(version).ok()?)))
        } else {
            range
                .rev()
                .find_map(|(key, slot)| Some((key, slot.get(version).ok()?)))
        };

        match found {
            Some((key, value)) => {
                let key = key.clone();
                if forward {
                    self.front = Bound::Excluded(key.clone());
                } else {
                    self.back = Bound::Excluded(key.clone());
                }
                Some((key, value))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<K: Ord + Clone, V: Clone> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.step(true)
    }
}

impl<K: Ord + Clone, V: Clone> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.step(false)
    }
}

impl<K: Ord + Clone, V: Clone> FusedIterator for Iter<'_, K, V> {}

impl<'a, K: Ord + Clone, V: Clone> IntoIterator for &'a VersionedMap<K, V> {
    type Item = (K, V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versionable::Versionable;

    #[test]
    fn test_iter_in_key_order() {
        let map = VersionedMap::new()
            .insert(3, 'c')
            .unwrap()
            .insert(1, 'a')
            .unwrap()
            .insert(2, 'b')
            .unwrap();

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_iter_skips_invisible_keys() {
        let v1 = VersionedMap::new().insert("b", 2).unwrap();
        let v2 = v1.insert("a", 1).unwrap().insert("c", 3).unwrap();
        let v3 = v2.remove("b").unwrap();

        assert_eq!(v1.iter().collect::<Vec<_>>(), vec![("b", 2)]);
        assert_eq!(
            v2.iter().collect::<Vec<_>>(),
            vec![("a", 1), ("b", 2), ("c", 3)]
        );
        assert_eq!(v3.iter().collect::<Vec<_>>(), vec![("a", 1), ("c", 3)]);
        assert_eq!(v3.undo().iter().count(), 3);
    }

    #[test]
    fn test_iter_from_both_ends() {
        let map = (1..=4).fold(VersionedMap::new(), |m, k| m.insert(k, k * 10).unwrap());

        let mut iter = map.iter();
        assert_eq!(iter.next(), Some((1, 10)));
        assert_eq!(iter.next_back(), Some((4, 40)));
        assert_eq!(iter.next_back(), Some((3, 30)));
        assert_eq!(iter.next(), Some((2, 20)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_iter_ignores_later_versions() {
        let v1 = VersionedMap::new().insert(1, 1).unwrap();
        let mut iter = v1.iter();
        let _v2 = v1.insert(0, 0).unwrap();

        assert_eq!(iter.next(), Some((1, 1)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_empty_map_iter() {
        let map: VersionedMap<u32, u32> = VersionedMap::new();
        assert_eq!(map.iter().next(), None);
        assert_eq!(map.iter().next_back(), None);
    }
}
