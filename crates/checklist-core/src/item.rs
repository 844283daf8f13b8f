//! Checklist items and their completion state.
//!
//! Item ids come from a single counter shared by every checklist, so an id
//! names one item across the whole store.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::checklist::{self, ChecklistId};
use crate::error::{ChecklistError, Result};
use crate::storage::age_sqlite::row::{ItemRow, ITEM_COLUMNS};
use crate::storage::{allocator, IdKind, Store};

/// Identifier of an item, unique across all checklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for i64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A single checklist entry.
///
/// `checked` is the state observed when this value was loaded or last
/// changed through it; [`Item::is_set`] reads the stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub checklist_id: ChecklistId,
    pub text: String,
    pub checked: bool,
}

impl Item {
    /// Create an unchecked item in `checklist_id`.
    ///
    /// The checklist is validated before an id is allocated, and both happen
    /// in one transaction, so a failed create never consumes an id.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::ChecklistNotFound` if the checklist does not
    /// exist.
    pub fn create(store: &Store, checklist_id: ChecklistId, text: &str) -> Result<Self> {
        let item = store.write(|tx| {
            if !checklist::exists(tx, checklist_id)? {
                return Err(ChecklistError::ChecklistNotFound(checklist_id));
            }

            let id = ItemId::new(allocator::next(tx, IdKind::Item)?);
            tx.execute(
                "INSERT INTO items (id, checklist_id, text, checked) VALUES (?, ?, ?, 0)",
                (id.get(), checklist_id.get(), text),
            )?;
            Ok(Item {
                id,
                checklist_id,
                text: text.to_owned(),
                checked: false,
            })
        })?;
        tracing::debug!(id = %item.id, checklist = %checklist_id, "created item");
        Ok(item)
    }

    /// Load the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::ItemNotFound` if there is none.
    pub fn load(store: &Store, id: ItemId) -> Result<Self> {
        store.read(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
                [id.get()],
                ItemRow::from_row,
            )
            .optional()?
            .ok_or(ChecklistError::ItemNotFound(id))
            .and_then(Item::try_from)
        })
    }

    /// The stored completion state.
    pub fn is_set(&self, store: &Store) -> Result<bool> {
        store.read(|conn| stored_state(conn, self.id))
    }

    /// Flip the completion state and return the new value.
    ///
    /// Toggles are serialized by the store, so concurrent toggles of the same
    /// item each apply exactly one flip and each caller sees the state its
    /// own write produced.
    pub fn toggle(&mut self, store: &Store) -> Result<bool> {
        let checked = Self::toggle_by_id(store, self.id)?;
        self.checked = checked;
        Ok(checked)
    }

    /// Flip the completion state of `id` without loading it first.
    pub fn toggle_by_id(store: &Store, id: ItemId) -> Result<bool> {
        let checked = store.write(|tx| {
            let updated = tx.execute(
                "UPDATE items SET checked = 1 - checked WHERE id = ?",
                [id.get()],
            )?;
            if updated == 0 {
                return Err(ChecklistError::ItemNotFound(id));
            }
            stored_state(tx, id)
        })?;
        tracing::debug!(id = %id, checked, "toggled item");
        Ok(checked)
    }

    /// Set the completion state explicitly.
    pub fn set_checked(&mut self, store: &Store, value: bool) -> Result<()> {
        let id = self.id;
        store.write(|tx| {
            let updated = tx.execute(
                "UPDATE items SET checked = ? WHERE id = ?",
                (value, id.get()),
            )?;
            if updated == 0 {
                return Err(ChecklistError::ItemNotFound(id));
            }
            Ok(())
        })?;
        self.checked = value;
        Ok(())
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn checklist_id(&self) -> ChecklistId {
        self.checklist_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn stored_state(conn: &Connection, id: ItemId) -> Result<bool> {
    conn.query_row(
        "SELECT checked FROM items WHERE id = ?",
        [id.get()],
        |row| row.get::<_, bool>(0),
    )
    .optional()?
    .ok_or(ChecklistError::ItemNotFound(id))
}
