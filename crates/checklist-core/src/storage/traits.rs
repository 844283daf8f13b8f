//! Storage engine trait definition.
//!
//! The `StorageEngine` trait is the lifecycle surface every backend offers:
//! open-or-create, metadata, integrity checking and close. Record access goes
//! through the backend's transaction boundary.

use std::path::Path;

use super::types::{StoreMetadata, StoreOptions};
use crate::crypto::KeyMaterial;
use crate::error::Result;

/// Storage engine interface for encrypted checklist stores.
///
/// All implementations must ensure:
/// - Data is encrypted at rest
/// - Every committed write reaches disk atomically
/// - Identifiers are never reissued
pub trait StorageEngine: Send + Sync {
    /// Open the store at `path`, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::Authentication` if an existing file cannot be
    /// decrypted with `key`, `ChecklistError::Io` if the path is unusable, and
    /// `ChecklistError::Locked` if another handle keeps the store busy.
    fn open(path: &Path, key: KeyMaterial) -> Result<Self>
    where
        Self: Sized,
    {
        Self::open_with(path, key, &StoreOptions::default())
    }

    /// Like [`StorageEngine::open`] with explicit options.
    fn open_with(path: &Path, key: KeyMaterial, options: &StoreOptions) -> Result<Self>
    where
        Self: Sized;

    /// Close the store, releasing its lock.
    ///
    /// Writes are already durable when they return, so close never loses
    /// data. Dropping the store has the same effect without error reporting.
    fn close(self) -> Result<()>;

    /// Get store metadata.
    fn metadata(&self) -> Result<StoreMetadata>;

    /// Check store integrity.
    ///
    /// Verifies:
    /// - Foreign key relationships
    /// - Counters are never behind the identifiers they issued
    /// - Required metadata is present
    fn check_integrity(&self) -> Result<()>;
}
