//! Cursors, positions and iteration over one list version
//!
//! A cursor walks the nodes visible at its view's version, skipping every
//! node the view cannot see. Each step takes the container read lock and
//! the lock of every node it inspects.

use std::iter::FusedIterator;

use super::VersionedList;
use crate::version::LineageId;

/// A copyable handle naming an element of a list lineage, or its end.
///
/// Positions are taken from a cursor and passed to `insert`/`remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(super) lineage: LineageId,
    pub(super) node: Option<usize>,
}

impl Position {
    /// True for the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn lineage_id(&self) -> LineageId {
        self.lineage
    }
}

/// A bidirectional cursor over the elements visible to one list view.
///
/// The cursor rests on a visible element or on the end position. Moving
/// forward from the last element reaches the end; moving back from the end
/// reaches the last element; moving back from the first element stays put.
pub struct Cursor<'a, T> {
    list: &'a VersionedList<T>,
    node: Option<usize>,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(list: &'a VersionedList<T>, node: Option<usize>) -> Self {
        Self { list, node }
    }

    /// True if the cursor is past the last element.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Handle for `insert`/`remove` on the latest view.
    pub fn position(&self) -> Position {
        Position {
            lineage: self.list.lineage_id(),
            node: self.node,
        }
    }

    /// Step to the next visible element, or to the end.
    pub fn move_next(&mut self) {
        if let Some(index) = self.node {
            let body = self.list.store.read();
            self.node = body.next_visible(index, self.list.version);
        }
    }

    /// Step to the previous visible element.
    pub fn move_prev(&mut self) {
        let body = self.list.store.read();
        match self.node {
            None => self.node = body.last_visible(self.list.version),
            Some(index) => {
                if let Some(prev) = body.prev_visible(index, self.list.version) {
                    self.node = Some(prev);
                }
            }
        }
    }
}

impl<T: Clone> Cursor<'_, T> {
    /// The element under the cursor, `None` at the end.
    pub fn current(&self) -> Option<T> {
        let index = self.node?;
        let body = self.list.store.read();
        body.node(index).map(|node| node.value.clone())
    }
}

/// Iterator over the elements of a `VersionedList` view, front to back.
///
/// Lazy: each step takes the storage lock only for that step. Nodes
/// committed after the view's version are never yielded.
pub struct Iter<'a, T> {
    list: &'a VersionedList<T>,
    front: Option<usize>,
    back: Option<usize>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(list: &'a VersionedList<T>) -> Self {
        let body = list.store.read();
        let front = body.first_visible(list.version);
        let back = body.last_visible(list.version);
        Self { list, front, back }
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = self.front?;
        let body = self.list.store.read();
        let value = body.node(index).map(|node| node.value.clone());
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = body.next_visible(index, self.list.version);
        }
        value
    }
}

impl<T: Clone> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        let index = self.back?;
        let body = self.list.store.read();
        let value = body.node(index).map(|node| node.value.clone());
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = body.prev_visible(index, self.list.version);
        }
        value
    }
}

impl<T: Clone> FusedIterator for Iter<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a VersionedList<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
