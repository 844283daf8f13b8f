//! Storage abstraction for Checklist.
//!
//! This module defines the `StorageEngine` trait and the Age-encrypted SQLite
//! backend that implements it.
//!
//! ## Architecture
//!
//! The database lives in memory while a store is open. Every committed write
//! serializes it, encrypts it with Age and atomically replaces the file on
//! disk, so the file always holds the state after the last successful
//! operation.
//!
//! ## Security
//!
//! - Encryption at rest (no plaintext modes)
//! - Key material is dropped and zeroized with the store handle
//! - One live handle per file, enforced with an advisory lock

pub mod age_sqlite;
pub mod encryption;
pub mod traits;
pub mod types;

// Re-export public types
pub use age_sqlite::{allocator, AgeSqliteStorage};
pub use traits::StorageEngine;
pub use types::{IdKind, StoreMetadata, StoreOptions};

/// The store used by the checklist and item repositories.
pub type Store = AgeSqliteStorage;
