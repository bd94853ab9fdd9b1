//! Index-order iteration over one array version

use std::iter::FusedIterator;

use super::VersionedArray;

/// Iterator over the elements of a `VersionedArray` view.
///
/// The length is fixed when the iterator is created; later versions of the
/// same lineage do not affect it.
pub struct Iter<'a, T> {
    array: &'a VersionedArray<T>,
    front: usize,
    back: usize,
}

impl<'a, T: Clone> Iter<'a, T> {
    pub(super) fn new(array: &'a VersionedArray<T>) -> Self {
        Self {
            array,
            front: 0,
            back: array.len(),
        }
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.array.get(self.front).ok();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.array.get(self.back).ok()
    }
}

impl<T: Clone> ExactSizeIterator for Iter<'_, T> {}

impl<T: Clone> FusedIterator for Iter<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a VersionedArray<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
