//! Filesystem helpers: atomic replacement and the store's sidecar lock.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use fs2::FileExt;

/// How long to sleep between lock attempts.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Replace `destination` with `data` so readers observe either the old or the
/// new contents, never a mix.
///
/// The bytes go to a uniquely named temp file in the same directory, are
/// synced, and the temp file is renamed over the destination.
pub fn write_atomic(destination: &Path, data: &[u8]) -> io::Result<()> {
    let parent = parent_dir(destination)?;
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid store filename"))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("System time error: {}", e)))?
        .as_nanos();
    let temp_path = parent.join(format!(".{}.{}.{}.tmp", filename, std::process::id(), nanos));

    let result = (|| {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    })();
    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    rename_with_fallback(&temp_path, destination)?;
    sync_dir(&parent);
    Ok(())
}

/// Rename `temp_path` over `destination`.
///
/// On Unix `rename` replaces the destination atomically, so a failure leaves
/// the destination untouched. Windows may refuse to overwrite; there the
/// destination is removed and the rename retried once. The temp file is
/// removed if the rename ultimately fails.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    let Err(initial_err) = fs::rename(temp_path, destination) else {
        return Ok(());
    };

    #[cfg(windows)]
    {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })
    }

    #[cfg(not(windows))]
    {
        let _ = fs::remove_file(temp_path);
        Err(initial_err)
    }
}

/// Path of the advisory lock file guarding `store_path`.
pub fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// An exclusive advisory lock, released when dropped.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Acquire the lock at `path`, polling until `timeout` elapses.
    ///
    /// Returns `Ok(None)` on timeout so the caller can report which store was
    /// busy.
    pub fn acquire(path: &Path, timeout: Duration) -> io::Result<Option<Self>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Some(Self {
                        file,
                        path: path.to_path_buf(),
                    }))
                }
                Err(err) if is_contended(&err) => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    tracing::trace!(path = %path.display(), "store lock busy, waiting");
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock, surfacing any unlock error.
    pub fn release(self) -> io::Result<()> {
        FileExt::unlock(&self.file)
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn parent_dir(path: &Path) -> io::Result<PathBuf> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid store path",
        )),
    }
}

/// Persist the rename itself. Best effort; not every platform can open a
/// directory for syncing.
fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
    #[cfg(not(unix))]
    let _ = dir;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("store.checklist");

        write_atomic(&dest, b"first").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"first");
    }

    #[test]
    fn test_write_atomic_replaces_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("store.checklist");

        write_atomic(&dest, b"old").unwrap();
        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_write_atomic_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("store.checklist");

        let err = write_atomic(&dest, b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp");
        let dest = dir.path().join("dest");
        fs::write(&dest, b"old").unwrap();
        fs::write(&temp, b"new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_rename_keeps_destination() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("vanished");
        let dest = dir.path().join("dest");
        fs::write(&dest, b"old").unwrap();

        let err = rename_with_fallback(&temp, &dest).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_lock_path_appends_suffix() {
        let path = Path::new("/tmp/db.checklist");
        assert_eq!(lock_path(path), PathBuf::from("/tmp/db.checklist.lock"));
    }

    #[test]
    fn test_second_lock_times_out_until_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.lock");

        let first = LockGuard::acquire(&path, Duration::from_millis(50))
            .unwrap()
            .expect("first lock");
        let second = LockGuard::acquire(&path, Duration::from_millis(50)).unwrap();
        assert!(second.is_none());

        first.release().unwrap();
        let third = LockGuard::acquire(&path, Duration::from_millis(50)).unwrap();
        assert!(third.is_some());
    }
}
