//! Version vocabulary shared by every container
//!
//! This module provides:
//! - `VersionId` - Totally ordered version identity
//! - `LineageId` - Identity of one storage lineage (one linear history)
//! - `VersionCounter` - The latest committed version of a lineage
//! - `VersionedSlot` - Append-only value history of one element ("fat node")
//!
//! # Invariants
//!
//! - Versions of a lineage form a single line: 0, 1, 2, ...
//! - A slot's entries are appended in strictly increasing version order
//! - Deletion is an appended tombstone, never an in-place edit

mod counter;
mod lineage;
mod slot;
mod version_id;

pub use counter::VersionCounter;
pub use lineage::{Lineage, LineageId};
pub use slot::{SlotEntry, VersionedSlot};
pub use version_id::VersionId;
