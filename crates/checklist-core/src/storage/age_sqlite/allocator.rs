//! Durable identifier allocation.
//!
//! Each identifier kind owns a row in the `counters` table. Allocating bumps
//! that row inside the caller's write transaction, so the new id and the
//! record it numbers commit or roll back together. Ids are never derived from
//! the records themselves, which keeps them unique even if records were
//! removed.

use rusqlite::{Connection, Transaction};

use crate::error::{ChecklistError, Result};
use crate::storage::types::IdKind;

/// Allocate the next identifier of `kind`.
///
/// The returned value is strictly greater than every value previously
/// returned for `kind` by this store.
///
/// # Errors
///
/// Returns `ChecklistError::Integrity` if the counter row is missing or the
/// new id is already taken by a record.
pub fn next(tx: &Transaction<'_>, kind: IdKind) -> Result<i64> {
    let updated = tx.execute(
        "UPDATE counters SET last_value = last_value + 1 WHERE kind = ?",
        [kind.as_str()],
    )?;
    if updated != 1 {
        return Err(ChecklistError::Integrity(format!(
            "Identifier counter '{}' is missing",
            kind
        )));
    }

    let id = last_issued(tx, kind)?;

    let taken: bool = tx.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", kind.table()),
        [id],
        |row| row.get(0),
    )?;
    if taken {
        return Err(ChecklistError::Integrity(format!(
            "Allocated {} id {} is already in use",
            kind, id
        )));
    }

    tracing::trace!(%kind, id, "allocated identifier");
    Ok(id)
}

/// The last identifier handed out for `kind`, or 0 if none was.
pub fn last_issued(conn: &Connection, kind: IdKind) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT last_value FROM counters WHERE kind = ?",
        [kind.as_str()],
        |row| row.get(0),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::age_sqlite::schema;

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::ensure(&conn).unwrap();
        conn
    }

    #[test]
    fn test_ids_increase_per_kind() {
        let mut conn = memory();
        let tx = conn.transaction().unwrap();

        assert_eq!(next(&tx, IdKind::Checklist).unwrap(), 1);
        assert_eq!(next(&tx, IdKind::Checklist).unwrap(), 2);
        assert_eq!(next(&tx, IdKind::Item).unwrap(), 1);
        assert_eq!(next(&tx, IdKind::Checklist).unwrap(), 3);
        tx.commit().unwrap();

        assert_eq!(last_issued(&conn, IdKind::Checklist).unwrap(), 3);
        assert_eq!(last_issued(&conn, IdKind::Item).unwrap(), 1);
    }

    #[test]
    fn test_rolled_back_allocation_is_not_consumed() {
        let mut conn = memory();
        {
            let tx = conn.transaction().unwrap();
            assert_eq!(next(&tx, IdKind::Item).unwrap(), 1);
            // dropped without commit
        }

        let tx = conn.transaction().unwrap();
        assert_eq!(next(&tx, IdKind::Item).unwrap(), 1);
    }

    #[test]
    fn test_missing_counter_is_integrity_error() {
        let mut conn = memory();
        conn.execute("DELETE FROM counters WHERE kind = 'item'", [])
            .unwrap();
        let tx = conn.transaction().unwrap();

        assert!(matches!(
            next(&tx, IdKind::Item),
            Err(ChecklistError::Integrity(_))
        ));
    }

    #[test]
    fn test_counter_behind_records_is_integrity_error() {
        let mut conn = memory();
        conn.execute("INSERT INTO checklists (id, name) VALUES (1, 'x')", [])
            .unwrap();
        let tx = conn.transaction().unwrap();

        let err = next(&tx, IdKind::Checklist).unwrap_err();
        assert!(err.to_string().contains("already in use"));
    }
}
