//! Error types for versioned collections
//!
//! Every error is a synchronous, local failure of one call. None is fatal:
//! the container stays usable after any of them, and a rejected mutation
//! never creates a version.

use thiserror::Error;

use crate::version::VersionId;

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Collection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A mutation was attempted on a view that is not the latest.
    ///
    /// Recover by moving to the latest view (`Versionable::latest`) and
    /// retrying.
    #[error("stale version: view is at {view} but the latest version is {latest}")]
    StaleVersion { view: VersionId, latest: VersionId },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// No live value is visible at the requested version.
    #[error("no value visible at {version}")]
    NotFound { version: VersionId },

    /// The key was never inserted into the map at any version.
    #[error("key was never inserted")]
    UnknownKey,

    /// A list position from another lineage, the end position where an
    /// element is required, or an element not visible at the latest version.
    #[error("position does not name a live element of this list")]
    InvalidPosition,
}

impl CollectionError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::StaleVersion { .. } => "PDC_STALE_VERSION",
            Self::IndexOutOfRange { .. } => "PDC_INDEX_OUT_OF_RANGE",
            Self::NotFound { .. } => "PDC_NOT_FOUND",
            Self::UnknownKey => "PDC_UNKNOWN_KEY",
            Self::InvalidPosition => "PDC_INVALID_POSITION",
        }
    }

    /// True for both the slot-level and the key-level "nothing here".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::UnknownKey)
    }

    /// True if the same call can succeed after refetching the latest view.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StaleVersion { .. })
    }
}

/// Errors from loading a `HistoryConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let stale = CollectionError::StaleVersion {
            view: VersionId::new(1),
            latest: VersionId::new(3),
        };
        assert_eq!(stale.code(), "PDC_STALE_VERSION");
        assert_eq!(
            CollectionError::IndexOutOfRange { index: 4, len: 2 }.code(),
            "PDC_INDEX_OUT_OF_RANGE"
        );
        assert_eq!(CollectionError::UnknownKey.code(), "PDC_UNKNOWN_KEY");
    }

    #[test]
    fn test_display_mentions_versions() {
        let stale = CollectionError::StaleVersion {
            view: VersionId::new(1),
            latest: VersionId::new(3),
        };
        let msg = stale.to_string();
        assert!(msg.contains("v1"));
        assert!(msg.contains("v3"));
    }

    #[test]
    fn test_not_found_family() {
        assert!(CollectionError::UnknownKey.is_not_found());
        assert!(CollectionError::NotFound { version: VersionId::ZERO }.is_not_found());
        assert!(!CollectionError::InvalidPosition.is_not_found());
    }

    #[test]
    fn test_only_stale_is_recoverable() {
        assert!(CollectionError::StaleVersion {
            view: VersionId::ZERO,
            latest: VersionId::new(1),
        }
        .is_recoverable());
        assert!(!CollectionError::IndexOutOfRange { index: 0, len: 0 }.is_recoverable());
    }
}
