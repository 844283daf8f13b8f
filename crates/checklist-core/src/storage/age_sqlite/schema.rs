//! Schema creation and evolution.
//!
//! Every statement is idempotent, so opening an older store adds whatever
//! tables or counter rows it lacks. A store written by a newer format is
//! refused rather than guessed at.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{ChecklistError, Result};
use crate::storage::types::IdKind;

/// Format version written to `meta.format_version`.
pub const FORMAT_VERSION: u32 = 1;

/// Metadata keys every store must carry.
pub const REQUIRED_META_KEYS: [&str; 4] =
    ["format_version", "store_id", "created_at", "last_modified"];

const TABLES: [&str; 4] = ["meta", "counters", "checklists", "items"];

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- One row per identifier kind; last_value is the last id handed out
    CREATE TABLE IF NOT EXISTS counters (
        kind TEXT PRIMARY KEY,
        last_value INTEGER NOT NULL CHECK (last_value >= 0)
    );

    CREATE TABLE IF NOT EXISTS checklists (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY,
        checklist_id INTEGER NOT NULL,
        text TEXT NOT NULL,
        checked INTEGER NOT NULL DEFAULT 0 CHECK (checked IN (0, 1)),

        FOREIGN KEY (checklist_id) REFERENCES checklists(id)
    );

    CREATE INDEX IF NOT EXISTS items_by_checklist ON items (checklist_id);
"#;

/// Bring `conn` up to the current schema.
///
/// Returns whether anything was added, in which case the caller must persist.
pub fn ensure(conn: &Connection) -> Result<bool> {
    let existing_tables: usize = TABLES
        .iter()
        .map(|table| table_exists(conn, table))
        .collect::<Result<Vec<bool>>>()?
        .into_iter()
        .filter(|exists| *exists)
        .count();
    let mut changed = existing_tables < TABLES.len();

    conn.execute_batch(SCHEMA)?;

    match read_format_version(conn)? {
        Some(version) if version > FORMAT_VERSION => {
            return Err(ChecklistError::Integrity(format!(
                "Store format version {} is newer than supported version {}",
                version, FORMAT_VERSION
            )));
        }
        Some(_) => {}
        None => {
            let now = Utc::now().to_rfc3339();
            let seeds = [
                ("format_version", FORMAT_VERSION.to_string()),
                ("store_id", Uuid::new_v4().to_string()),
                ("created_at", now.clone()),
                ("last_modified", now),
            ];
            for (key, value) in seeds {
                conn.execute(
                    "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
                    (key, value),
                )?;
            }
            changed = true;
        }
    }

    // Counters start at the highest id already present, so stores that
    // predate the counters table never reissue an id.
    for kind in IdKind::ALL {
        let inserted = conn.execute(
            &format!(
                "INSERT OR IGNORE INTO counters (kind, last_value) SELECT ?, COALESCE(MAX(id), 0) FROM {}",
                kind.table()
            ),
            [kind.as_str()],
        )?;
        changed |= inserted > 0;
    }

    Ok(changed)
}

/// Read a required metadata value.
pub fn meta_value(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
        row.get(0)
    })
    .optional()?
    .ok_or_else(|| ChecklistError::Integrity(format!("Metadata key '{}' is missing", key)))
}

fn read_format_version(conn: &Connection) -> Result<Option<u32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'format_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    value
        .map(|v| {
            v.parse::<u32>().map_err(|e| {
                ChecklistError::Integrity(format!("Invalid format_version '{}': {}", v, e))
            })
        })
        .transpose()
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        [name],
        |row| row.get(0),
    )?)
}
