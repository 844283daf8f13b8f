//! Core storage types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChecklistError, Result};

/// Store metadata, recorded in the `meta` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// On-disk format version
    pub format_version: u32,

    /// Random identifier assigned when the store was created
    pub store_id: Uuid,

    /// When the store was created
    pub created_at: DateTime<Utc>,

    /// Last successful write
    pub last_modified: DateTime<Utc>,
}

/// Tunables for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// scrypt work factor (log2 N) used when writing. `None` uses Age's default.
    pub work_factor: Option<u8>,

    /// How long to wait for another handle to release the store lock.
    pub lock_timeout: Duration,
}

impl StoreOptions {
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

    /// Smallest scrypt work factor accepted for writing.
    pub const MIN_WORK_FACTOR: u8 = 1;

    /// Largest scrypt work factor accepted for writing, and the most a store
    /// is allowed to demand when it is opened.
    pub const MAX_WORK_FACTOR: u8 = 22;

    pub fn with_work_factor(mut self, log_n: u8) -> Self {
        self.work_factor = Some(log_n);
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Reject settings the store could not honor.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::WorkFactor` if the work factor is outside
    /// `MIN_WORK_FACTOR..=MAX_WORK_FACTOR`.
    pub fn validate(&self) -> Result<()> {
        match self.work_factor {
            Some(log_n) => Self::check_work_factor(log_n),
            None => Ok(()),
        }
    }

    pub(crate) fn check_work_factor(log_n: u8) -> Result<()> {
        if (Self::MIN_WORK_FACTOR..=Self::MAX_WORK_FACTOR).contains(&log_n) {
            Ok(())
        } else {
            Err(ChecklistError::WorkFactor {
                log_n,
                min: Self::MIN_WORK_FACTOR,
                max: Self::MAX_WORK_FACTOR,
            })
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            work_factor: None,
            lock_timeout: Self::DEFAULT_LOCK_TIMEOUT,
        }
    }
}

/// Counter kinds handed out by the identifier allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Checklist,
    Item,
}

impl IdKind {
    pub const ALL: [IdKind; 2] = [IdKind::Checklist, IdKind::Item];

    /// Key of this kind's row in the `counters` table.
    pub fn as_str(self) -> &'static str {
        match self {
            IdKind::Checklist => "checklist",
            IdKind::Item => "item",
        }
    }

    /// Table whose primary keys this counter numbers.
    pub(crate) fn table(self) -> &'static str {
        match self {
            IdKind::Checklist => "checklists",
            IdKind::Item => "items",
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
