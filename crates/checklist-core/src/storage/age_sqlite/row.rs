//! Row types for database queries.

use rusqlite::Row;

use crate::checklist::{Checklist, ChecklistId};
use crate::error::{ChecklistError, Result};
use crate::item::{Item, ItemId};

pub const CHECKLIST_COLUMNS: &str = "id, name";
pub const ITEM_COLUMNS: &str = "id, checklist_id, text, checked";

/// Raw row data from the checklists table, before parsing into domain types.
#[derive(Debug)]
pub struct ChecklistRow {
    pub id: i64,
    pub name: String,
}

impl ChecklistRow {
    /// Read a row selected with [`CHECKLIST_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

impl TryFrom<ChecklistRow> for Checklist {
    type Error = ChecklistError;

    fn try_from(row: ChecklistRow) -> Result<Self> {
        Ok(Checklist {
            id: ChecklistId::new(positive_id("checklist", row.id)?),
            name: row.name,
        })
    }
}

/// Raw row data from the items table.
#[derive(Debug)]
pub struct ItemRow {
    pub id: i64,
    pub checklist_id: i64,
    pub text: String,
    pub checked: i64,
}

impl ItemRow {
    /// Read a row selected with [`ITEM_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            checklist_id: row.get(1)?,
            text: row.get(2)?,
            checked: row.get(3)?,
        })
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = ChecklistError;

    fn try_from(row: ItemRow) -> Result<Self> {
        let checked = match row.checked {
            0 => false,
            1 => true,
            other => {
                return Err(ChecklistError::Integrity(format!(
                    "Item {} has invalid checked value {}",
                    row.id, other
                )))
            }
        };
        Ok(Item {
            id: ItemId::new(positive_id("item", row.id)?),
            checklist_id: ChecklistId::new(positive_id("checklist", row.checklist_id)?),
            text: row.text,
            checked,
        })
    }
}

fn positive_id(kind: &str, id: i64) -> Result<i64> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ChecklistError::Integrity(format!(
            "Invalid {} id {}",
            kind, id
        )))
    }
}
