//! Error types for Checklist core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and exit codes.

use std::path::PathBuf;

use thiserror::Error;

use crate::checklist::ChecklistId;
use crate::item::ItemId;

/// Result type alias for Checklist operations.
pub type Result<T> = std::result::Result<T, ChecklistError>;

/// Core error type for Checklist operations.
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// The store could not be decrypted with the supplied key
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Checklist not found by ID
    #[error("Checklist not found: {0}")]
    ChecklistNotFound(ChecklistId),

    /// Item not found by ID
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Internal invariant violated
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Another handle holds the store lock
    #[error("Store is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    /// Unusable key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// scrypt work factor outside the supported range, either requested for
    /// writing or demanded by a store being opened
    #[error("Unsupported scrypt work factor {log_n} (supported: {min}..={max})")]
    WorkFactor { log_n: u8, min: u8, max: u8 },

    /// Encryption error not attributable to the key
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Background task failed to complete
    #[error("Background task failed: {0}")]
    Task(String),
}

impl ChecklistError {
    /// Whether this error reports a missing checklist or item.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ChecklistError::ChecklistNotFound(_) | ChecklistError::ItemNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_grouping() {
        assert!(ChecklistError::ChecklistNotFound(ChecklistId::new(1)).is_not_found());
        assert!(ChecklistError::ItemNotFound(ItemId::new(7)).is_not_found());
        assert!(!ChecklistError::Integrity("x".to_string()).is_not_found());
    }

    #[test]
    fn test_messages_name_the_id() {
        let err = ChecklistError::ItemNotFound(ItemId::new(42));
        assert_eq!(err.to_string(), "Item not found: 42");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChecklistError = io.into();
        assert!(matches!(err, ChecklistError::Io { .. }));
    }
}
