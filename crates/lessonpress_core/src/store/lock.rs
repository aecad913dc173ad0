//! Write serialization for source files: an in-process mutex per path plus an
//! advisory OS lock on a sibling `.lock` file.

use crate::constants::STORE_LOCK_EXTENSION;
use crate::error::AppError;
use fs2::FileExt;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Held exclusive lock on `<file>.lock`; released on drop.
pub struct StoreLockGuard {
    file: File,
    lock_path: PathBuf,
}

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            tracing::warn!(
                "Failed to release store lock {:?} during drop: {}",
                self.lock_path,
                err
            );
        }
    }
}

/// Return the lock file path for a source file (`<file>.lock`).
pub fn store_lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(STORE_LOCK_EXTENSION);
    PathBuf::from(name)
}

/// Block until the exclusive lock for `path` is held.
///
/// # Errors
/// Returns [`AppError::Io`] when the lock file cannot be opened or locked.
pub fn acquire_store_lock(path: &Path) -> Result<StoreLockGuard, AppError> {
    let lock_path = store_lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)?;
    file.lock_exclusive()?;
    Ok(StoreLockGuard { file, lock_path })
}

/// Hands out one shared mutex per source file.
///
/// Keys are canonical paths, so only files that exist get an entry and two
/// spellings of one file share a mutex.
#[derive(Default)]
pub struct WriterRegistry {
    writers: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl WriterRegistry {
    /// Mutex guarding read-modify-write cycles on `path`.
    ///
    /// `path` is canonicalized first.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when `path` does not exist and
    /// [`AppError::Unexpected`] when the registry is poisoned.
    pub fn writer_for(&self, path: &Path) -> Result<Arc<Mutex<()>>, AppError> {
        let key = std::fs::canonicalize(path).map_err(|err| super::source_error(path, err))?;
        let mut writers = self
            .writers
            .lock()
            .map_err(|_| AppError::Unexpected("writer registry is poisoned".to_string()))?;
        Ok(writers.entry(key).or_default().clone())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.writers.lock().map(|writers| writers.len()).unwrap_or_default()
    }
}
