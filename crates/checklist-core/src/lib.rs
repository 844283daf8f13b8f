//! # Checklist Core
//!
//! Core library for Checklist - encrypted, durable storage for checklists and
//! their items.
//!
//! This crate provides the storage engine and the record repositories,
//! independent of any command-line interface.
//!
//! ## Architecture
//!
//! - **crypto**: Key material handling
//! - **storage**: Storage engine trait, Age-encrypted SQLite backend and
//!   identifier allocation
//! - **checklist**: Checklist creation and lookup
//! - **item**: Item creation, lookup and toggling
//! - **nonblocking**: Async adapter (feature `tokio`)
//!
//! ## Example
//!
//! ```no_run
//! use checklist_core::{Checklist, Item, KeyMaterial, StorageEngine, Store};
//!
//! # fn main() -> checklist_core::Result<()> {
//! let key = KeyMaterial::new(std::fs::read("checklist.key")?)?;
//! let store = Store::open("db.checklist".as_ref(), key)?;
//!
//! let groceries = Checklist::create(&store, "Groceries")?;
//! let mut milk = Item::create(&store, groceries.id(), "Milk")?;
//! assert!(milk.toggle(&store)?);
//! # Ok(())
//! # }
//! ```

pub mod checklist;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod item;
#[cfg(feature = "tokio")]
pub mod nonblocking;
pub mod storage;

pub use checklist::{Checklist, ChecklistId};
pub use crypto::KeyMaterial;
pub use error::{ChecklistError, Result};
pub use item::{Item, ItemId};
pub use storage::{IdKind, StorageEngine, Store, StoreMetadata, StoreOptions};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
