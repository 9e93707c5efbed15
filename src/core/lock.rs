//! core::lock
//!
//! Exclusive lock on a hierarchy document.
//!
//! # Architecture
//!
//! Every mutating command runs load, mutate, save while holding this lock, so
//! two `bsg` processes never interleave writes to the same document. The
//! lock lives next to the document at `<document>.lock`.
//!
//! # Invariants
//!
//! - Lock must be held from load through save
//! - Lock is released on drop
//! - Acquisition is non-blocking (fails fast if locked)
//!
//! # Example
//!
//! ```no_run
//! use blendgroups::core::lock::DocumentLock;
//! use std::path::Path;
//!
//! let lock = DocumentLock::acquire(Path::new("groups.json")).unwrap();
//! // load, mutate, save
//! drop(lock);
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("document '{0}' is locked by another bsg process")]
    AlreadyLocked(PathBuf),

    /// Failed to create the lock file or its directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on one document.
#[derive(Debug)]
pub struct DocumentLock {
    path: PathBuf,
    /// Some while the lock is held.
    file: Option<File>,
}

/// Lock file path for `document`.
pub fn lock_path(document: &Path) -> PathBuf {
    let mut name = OsString::from(document.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

impl DocumentLock {
    /// Acquire the lock for `document`.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(document: &Path) -> Result<Self, LockError> {
        if let Some(dir) = document.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                LockError::CreateFailed(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let path = lock_path(document);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked(document.to_path_buf()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Whether this guard still holds the lock.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock before the guard is dropped.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
