//! Checklists: named containers of items.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{ChecklistError, Result};
use crate::item::Item;
use crate::storage::age_sqlite::row::{ChecklistRow, ItemRow, CHECKLIST_COLUMNS, ITEM_COLUMNS};
use crate::storage::{allocator, IdKind, Store};

/// Identifier of a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistId(i64);

impl ChecklistId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ChecklistId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ChecklistId> for i64 {
    fn from(id: ChecklistId) -> Self {
        id.0
    }
}

impl fmt::Display for ChecklistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ChecklistId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A named checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    pub name: String,
}

impl Checklist {
    /// Create a checklist named `name`.
    ///
    /// The name is stored as given; empty names are accepted.
    pub fn create(store: &Store, name: &str) -> Result<Self> {
        let checklist = store.write(|tx| {
            let id = ChecklistId::new(allocator::next(tx, IdKind::Checklist)?);
            tx.execute(
                "INSERT INTO checklists (id, name) VALUES (?, ?)",
                (id.get(), name),
            )?;
            Ok(Checklist {
                id,
                name: name.to_owned(),
            })
        })?;
        tracing::debug!(id = %checklist.id, "created checklist");
        Ok(checklist)
    }

    /// Load the checklist with `id`.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::ChecklistNotFound` if there is none.
    pub fn load(store: &Store, id: ChecklistId) -> Result<Self> {
        store.read(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM checklists WHERE id = ?", CHECKLIST_COLUMNS),
                [id.get()],
                ChecklistRow::from_row,
            )
            .optional()?
            .ok_or(ChecklistError::ChecklistNotFound(id))
            .and_then(Checklist::try_from)
        })
    }

    /// All checklists, ordered by id.
    pub fn all(store: &Store) -> Result<Vec<Self>> {
        store.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM checklists ORDER BY id",
                CHECKLIST_COLUMNS
            ))?;
            let rows = stmt.query_map([], ChecklistRow::from_row)?;

            let mut checklists = Vec::new();
            for row in rows {
                checklists.push(Checklist::try_from(row?)?);
            }
            Ok(checklists)
        })
    }

    /// Items of this checklist, ordered by id.
    pub fn items(&self, store: &Store) -> Result<Vec<Item>> {
        store.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM items WHERE checklist_id = ? ORDER BY id",
                ITEM_COLUMNS
            ))?;
            let rows = stmt.query_map([self.id.get()], ItemRow::from_row)?;

            let mut items = Vec::new();
            for row in rows {
                items.push(Item::try_from(row?)?);
            }
            Ok(items)
        })
    }

    pub fn id(&self) -> ChecklistId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Whether a checklist with `id` exists.
pub(crate) fn exists(conn: &Connection, id: ChecklistId) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM checklists WHERE id = ?)",
        [id.get()],
        |row| row.get(0),
    )?)
}
