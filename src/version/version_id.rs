//! VersionId - Totally ordered version identity
//!
//! - Version 0 is the state produced by a container's constructor
//! - Every successful mutation produces exactly one new version
//! - No two mutations of one lineage share a version

use std::fmt;

/// A totally ordered, opaque version identity.
///
/// A view reads the newest entry of every slot whose version is not
/// greater than the view's own `VersionId`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VersionId(u64);

impl VersionId {
    /// The version every lineage starts at.
    pub const ZERO: VersionId = VersionId(0);

    /// Creates a new VersionId with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The version that immediately follows this one.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The version that immediately precedes this one, clamped at zero.
    #[inline]
    pub fn prev_saturating(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
