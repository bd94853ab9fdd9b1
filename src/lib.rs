//! pdc - Partially persistent collections
//!
//! Array, doubly-linked list and ordered map variants that keep every
//! historical state. A container value is a view: shared storage plus the
//! version it reads at. Any view can step backward and forward through the
//! history (`Versionable::undo`/`redo`); only the latest view may mutate,
//! so the history stays a single line.
//!
//! ```
//! use pdc::{VersionedArray, Versionable};
//!
//! let a = VersionedArray::new().push_back(0).unwrap();
//! let b = a.update(0, 1).unwrap();
//!
//! assert_eq!(a.get(0).unwrap(), 0);
//! assert_eq!(b.get(0).unwrap(), 1);
//! assert_eq!(b.undo().get(0).unwrap(), 0);
//!
//! // `a` is no longer the latest view
//! assert!(a.push_back(2).is_err());
//! ```

pub mod array;
pub mod config;
pub mod errors;
pub mod list;
pub mod map;
pub mod observability;
pub mod version;
pub mod versionable;

pub use array::VersionedArray;
pub use config::HistoryConfig;
pub use errors::{CollectionError, CollectionResult, ConfigError};
pub use list::{Cursor, Position, VersionedList};
pub use map::VersionedMap;
pub use version::{LineageId, VersionId, VersionedSlot};
pub use versionable::Versionable;
