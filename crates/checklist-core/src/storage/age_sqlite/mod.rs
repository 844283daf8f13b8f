//! Age-encrypted SQLite storage backend.
//!
//! The database is held in memory while the store is open. Each committed
//! write is serialized, encrypted with Age and written to disk atomically
//! before the write returns.

pub mod allocator;
pub(crate) mod row;
pub(crate) mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::serialize::OwnedData;
use rusqlite::{Connection, DatabaseName, ErrorCode, Transaction};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::KeyMaterial;
use crate::error::{ChecklistError, Result};
use crate::fs::{lock_path, write_atomic, LockGuard};
use crate::storage::encryption::{decrypt, encrypt};
use crate::storage::traits::StorageEngine;
use crate::storage::types::{IdKind, StoreMetadata, StoreOptions};

/// Age-encrypted SQLite storage engine.
///
/// Field order matters: the connection and key drop before the lock is
/// released.
pub struct AgeSqliteStorage {
    path: PathBuf,
    conn: Mutex<Connection>,
    key: KeyMaterial,
    work_factor: Option<u8>,
    store_id: Uuid,
    lock: LockGuard,
}

impl std::fmt::Debug for AgeSqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgeSqliteStorage")
            .field("path", &self.path)
            .field("store_id", &self.store_id)
            .field("work_factor", &self.work_factor)
            .finish_non_exhaustive()
    }
}

impl AgeSqliteStorage {
    /// Path of the encrypted store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only query against the store.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock_conn()?;
        f(&conn)
    }

    /// Run `f` inside a transaction and persist the result.
    ///
    /// If `f` fails the transaction rolls back and nothing is written. If
    /// persisting fails the in-memory database is restored to its state
    /// before `f`, so memory and disk never disagree.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock_conn()?;
        let snapshot = Zeroizing::new(conn.serialize(DatabaseName::Main)?.to_vec());

        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.execute(
            "UPDATE meta SET value = ? WHERE key = 'last_modified'",
            [Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        if let Err(err) = self.persist(&conn) {
            tracing::debug!(path = %self.path.display(), error = %err, "persist failed, restoring snapshot");
            let restored = Self::owned_data_from_bytes(&snapshot)?;
            conn.deserialize(DatabaseName::Main, restored, false)?;
            return Err(err);
        }

        Ok(value)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ChecklistError::Storage("SQLite connection poisoned".to_string()))
    }

    fn persist(&self, conn: &Connection) -> Result<()> {
        let data = conn.serialize(DatabaseName::Main)?;
        let encrypted = encrypt(&data, &self.key, self.work_factor)?;
        write_atomic(&self.path, &encrypted)?;
        tracing::debug!(path = %self.path.display(), bytes = encrypted.len(), "store persisted");
        Ok(())
    }

    fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
        if bytes.is_empty() {
            return Err(ChecklistError::Storage("SQLite payload is empty".to_string()));
        }

        let size: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| ChecklistError::Storage("SQLite payload too large".to_string()))?;

        // SAFETY: sqlite3_malloc returns a valid pointer or null. Null is checked
        // immediately below, and size has been validated to fit in i32.
        let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
        if raw.is_null() {
            return Err(ChecklistError::Storage("SQLite allocation failed".to_string()));
        }

        // SAFETY:
        // - `raw` is non-null and writable for `bytes.len()` bytes (allocated above)
        // - `bytes` is valid for reads of `bytes.len()` bytes
        // - the regions cannot overlap since `raw` is freshly allocated
        // - `OwnedData` takes ownership of the sqlite3_malloc'd buffer and frees it
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), raw, bytes.len());
            let ptr = NonNull::new(raw).ok_or_else(|| {
                ChecklistError::Storage("SQLite allocation returned null".to_string())
            })?;
            Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
        }
    }

    /// Decrypt and load an existing store file.
    fn load(path: &Path, key: &KeyMaterial) -> Result<Connection> {
        let encrypted = fs::read(path)?;
        let plaintext = decrypt(&encrypted, key)?;
        if plaintext.is_empty() {
            return Err(ChecklistError::Authentication(
                "Store payload is empty".to_string(),
            ));
        }

        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let owned_data = Self::owned_data_from_bytes(&plaintext)?;
        conn.deserialize(DatabaseName::Main, owned_data, false)?;

        // A payload that decrypts but is not a database means the file was
        // tampered with or written by something else.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt) => {
                ChecklistError::Authentication(format!("Store payload is not a database: {}", e))
            }
            _ => e.into(),
        })?;

        Ok(conn)
    }
}

impl StorageEngine for AgeSqliteStorage {
    fn open_with(path: &Path, key: KeyMaterial, options: &StoreOptions) -> Result<Self> {
        options.validate()?;

        let lock = LockGuard::acquire(&lock_path(path), options.lock_timeout)?
            .ok_or_else(|| ChecklistError::Locked(path.to_path_buf()))?;

        let exists = path.exists();
        let conn = if exists {
            Self::load(path, &key)?
        } else {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn
        };
        let changed = schema::ensure(&conn)?;

        let store_id = Uuid::parse_str(&schema::meta_value(&conn, "store_id")?)
            .map_err(|e| ChecklistError::Integrity(format!("Invalid store_id in metadata: {}", e)))?;

        let storage = Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
            key,
            work_factor: options.work_factor,
            store_id,
            lock,
        };

        if changed {
            let conn = storage.lock_conn()?;
            storage.persist(&conn)?;
        }

        tracing::debug!(
            path = %path.display(),
            lock = %storage.lock.path().display(),
            created = !exists,
            "store opened"
        );
        Ok(storage)
    }

    fn close(self) -> Result<()> {
        let Self { conn, lock, .. } = self;
        drop(conn);
        lock.release()?;
        Ok(())
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        self.read(|conn| {
            let format_version = schema::meta_value(conn, "format_version")?
                .parse::<u32>()
                .map_err(|e| ChecklistError::Integrity(format!("Invalid format_version: {}", e)))?;

            Ok(StoreMetadata {
                format_version,
                store_id: self.store_id,
                created_at: parse_timestamp(&schema::meta_value(conn, "created_at")?)?,
                last_modified: parse_timestamp(&schema::meta_value(conn, "last_modified")?)?,
            })
        })
    }

    fn check_integrity(&self) -> Result<()> {
        self.read(|conn| {
            let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
            let mut rows = stmt.query([])?;
            if rows.next()?.is_some() {
                return Err(ChecklistError::Integrity(
                    "Foreign key integrity check failed".to_string(),
                ));
            }

            for kind in IdKind::ALL {
                let issued = allocator::last_issued(conn, kind)?;
                let highest: i64 = conn.query_row(
                    &format!("SELECT COALESCE(MAX(id), 0) FROM {}", kind.table()),
                    [],
                    |row| row.get(0),
                )?;
                if highest > issued {
                    return Err(ChecklistError::Integrity(format!(
                        "Counter '{}' ({}) is behind the highest stored id ({})",
                        kind, issued, highest
                    )));
                }
            }

            for key in schema::REQUIRED_META_KEYS {
                schema::meta_value(conn, key)?;
            }

            Ok(())
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| ChecklistError::Integrity(format!("Invalid timestamp '{}': {}", value, e)))?
        .with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    fn options() -> StoreOptions {
        StoreOptions::default()
            .with_work_factor(10)
            .with_lock_timeout(Duration::from_millis(100))
    }

    fn key(value: &str) -> KeyMaterial {
        KeyMaterial::new(value).unwrap()
    }

    fn fresh() -> (TempDir, PathBuf, AgeSqliteStorage) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.checklist");
        let store = AgeSqliteStorage::open_with(&path, key("test-key"), &options()).unwrap();
        (dir, path, store)
    }

    #[test]
    fn test_open_creates_encrypted_file() {
        let (_dir, path, store) = fresh();

        assert!(path.exists());
        let on_disk = fs::read(&path).unwrap();
        assert!(!on_disk.starts_with(b"SQLite format 3"));
        store.close().unwrap();
    }

    #[test]
    fn test_metadata_survives_reopen() {
        let (_dir, path, store) = fresh();
        let before = store.metadata().unwrap();
        assert_eq!(before.format_version, schema::FORMAT_VERSION);
        store.close().unwrap();

        let store = AgeSqliteStorage::open_with(&path, key("test-key"), &options()).unwrap();
        let after = store.metadata().unwrap();
        assert_eq!(after.store_id, before.store_id);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let (_dir, path, store) = fresh();
        let on_disk = fs::read(&path).unwrap();

        let result: Result<()> = store.write(|tx| {
            tx.execute("INSERT INTO checklists (id, name) VALUES (1, 'x')", [])?;
            Err(ChecklistError::Integrity("abort".to_string()))
        });

        assert!(result.is_err());
        let count: i64 = store
            .read(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM checklists", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(fs::read(&path).unwrap(), on_disk);
    }

    #[test]
    fn test_failed_persist_restores_memory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let path = nested.join("test.checklist");
        let store = AgeSqliteStorage::open_with(&path, key("test-key"), &options()).unwrap();

        // Pull the directory out from under the store so the rename fails.
        fs::remove_dir_all(&nested).unwrap();

        let result = store.write(|tx| {
            tx.execute("INSERT INTO checklists (id, name) VALUES (1, 'x')", [])?;
            Ok(())
        });

        assert!(matches!(result, Err(ChecklistError::Io { .. })));
        let count: i64 = store
            .read(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM checklists", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_check_integrity_passes_on_fresh_store() {
        let (_dir, _path, store) = fresh();
        store.check_integrity().unwrap();
    }

    #[test]
    fn test_check_integrity_detects_lagging_counter() {
        let (_dir, _path, store) = fresh();
        store
            .write(|tx| {
                tx.execute("INSERT INTO checklists (id, name) VALUES (5, 'x')", [])?;
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            store.check_integrity(),
            Err(ChecklistError::Integrity(_))
        ));
    }

    #[test]
    fn test_second_handle_is_locked_out() {
        let (_dir, path, store) = fresh();

        let second = AgeSqliteStorage::open_with(&path, key("test-key"), &options());
        assert!(matches!(second, Err(ChecklistError::Locked(_))));

        store.close().unwrap();
        AgeSqliteStorage::open_with(&path, key("test-key"), &options()).unwrap();
    }

    #[test]
    fn test_invalid_work_factor_is_rejected_before_touching_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.checklist");

        for log_n in [0, 64, StoreOptions::MAX_WORK_FACTOR + 1] {
            let result = AgeSqliteStorage::open_with(
                &path,
                key("test-key"),
                &options().with_work_factor(log_n),
            );
            assert!(matches!(result, Err(ChecklistError::WorkFactor { .. })));
        }
        assert!(!path.exists());
        assert!(!lock_path(&path).exists());
    }

    #[test]
    fn test_debug_omits_key() {
        let (_dir, _path, store) = fresh();
        let debug_output = format!("{:?}", store);
        assert!(!debug_output.contains("test-key"));
    }
}
