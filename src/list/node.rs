//! List storage: node arena, links, and the visibility filter
//!
//! Every node ever inserted stays in the arena and in the link order. A
//! node is created once at its insertion version and is only ever
//! soft-deleted. Which nodes a view sees is decided per node:
//!
//! - `inserted > V`: invisible (not yet created at V)
//! - `inserted == V`: visible (created by the mutation that made V)
//! - `inserted < V`: visible unless deleted at or before V
//!
//! Links (`prev`/`next`, `head`/`tail`) are guarded by the container lock.
//! A node's deletion state is guarded by the node's own lock, always taken
//! after the container lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::version::VersionId;

#[derive(Debug, Default)]
pub(super) struct NodeState {
    deleted_at: Option<VersionId>,
}

#[derive(Debug)]
pub(super) struct ListNode<T> {
    pub(super) value: T,
    inserted: VersionId,
    state: Mutex<NodeState>,
}

impl<T> ListNode<T> {
    fn new(value: T, inserted: VersionId) -> Self {
        Self {
            value,
            inserted,
            state: Mutex::new(NodeState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn is_visible_at(&self, version: VersionId) -> bool {
        let state = self.lock();
        if self.inserted == version {
            return true;
        }
        self.inserted < version && state.deleted_at.map_or(true, |deleted| deleted > version)
    }

    pub(super) fn mark_deleted(&self, version: VersionId) {
        let mut state = self.lock();
        debug_assert!(state.deleted_at.is_none());
        debug_assert!(self.inserted < version);
        state.deleted_at = Some(version);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Links {
    prev: Option<usize>,
    next: Option<usize>,
}

/// Where a new node is linked.
#[derive(Debug, Clone, Copy)]
pub(super) enum Anchor {
    Front,
    Back,
    Before(usize),
}

#[derive(Debug)]
pub(super) struct ListBody<T> {
    nodes: Vec<ListNode<T>>,
    links: Vec<Links>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> ListBody<T> {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            links: Vec::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub(super) fn node(&self, index: usize) -> Option<&ListNode<T>> {
        self.nodes.get(index)
    }

    /// Walk from `start` (inclusive) until a node visible at `version`.
    fn skip_invisible(&self, start: Option<usize>, version: VersionId, forward: bool) -> Option<usize> {
        let mut current = start;
        while let Some(index) = current {
            if self.nodes[index].is_visible_at(version) {
                return Some(index);
            }
            let links = self.links[index];
            current = if forward { links.next } else { links.prev };
        }
        None
    }

    pub(super) fn first_visible(&self, version: VersionId) -> Option<usize> {
        self.skip_invisible(self.head, version, true)
    }

    pub(super) fn last_visible(&self, version: VersionId) -> Option<usize> {
        self.skip_invisible(self.tail, version, false)
    }

    pub(super) fn next_visible(&self, index: usize, version: VersionId) -> Option<usize> {
        self.skip_invisible(self.links[index].next, version, true)
    }

    pub(super) fn prev_visible(&self, index: usize, version: VersionId) -> Option<usize> {
        self.skip_invisible(self.links[index].prev, version, false)
    }

    pub(super) fn count_visible(&self, version: VersionId) -> usize {
        let mut count = 0;
        let mut current = self.first_visible(version);
        while let Some(index) = current {
            count += 1;
            current = self.next_visible(index, version);
        }
        count
    }

    /// Link a new node created at `version` and return its index.
    pub(super) fn link(&mut self, anchor: Anchor, value: T, version: VersionId) -> usize {
        let index = self.nodes.len();
        self.nodes.push(ListNode::new(value, version));

        let (prev, next) = match anchor {
            Anchor::Front => (None, self.head),
            Anchor::Back => (self.tail, None),
            Anchor::Before(at) => (self.links[at].prev, Some(at)),
        };
        self.links.push(Links { prev, next });

        match prev {
            Some(p) => self.links[p].next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(n) => self.links[n].prev = Some(index),
            None => self.tail = Some(index),
        }
        index
    }
}
