//! # Repository Lock
//!
//! The ref namespace, the working tree, and the graft file are all
//! process-wide filesystem state with no built-in locking, so every mutating
//! operation must be serialized per repository. This module provides an
//! advisory lock file (`<git-dir>/rgit.lock`) created exclusively and held
//! for the lifetime of the operation.
//!
//! An existing lock file means either a concurrent rgit invocation or a
//! previous one that was killed mid-operation (possibly leaving the
//! repository uncapped or mid-stash). Both cases refuse with
//! `Error::LockHeld` instead of proceeding; a stale lock is for the operator
//! to inspect and remove.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const LOCK_FILE: &str = "rgit.lock";

/// An acquired repository lock. Released (the file removed) on drop.
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
}

impl RepoLock {
    /// Acquire the lock for the repository owning `git_dir`.
    pub fn acquire(git_dir: &Path) -> Result<Self> {
        let path = git_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    Error::LockHeld { path: path.clone() }
                } else {
                    Error::Io(e)
                }
            })?;
        // Record the owner for operators inspecting a stale lock.
        let _ = writeln!(file, "{}", std::process::id());

        log::debug!("acquired repository lock {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("failed to release lock {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_and_drop_removes() {
        let git_dir = TempDir::new().unwrap();

        let lock = RepoLock::acquire(git_dir.path()).unwrap();
        assert!(lock.path().exists());

        let path = lock.path().to_path_buf();
        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let git_dir = TempDir::new().unwrap();

        let _lock = RepoLock::acquire(git_dir.path()).unwrap();
        let err = RepoLock::acquire(git_dir.path()).unwrap_err();
        assert!(matches!(err, Error::LockHeld { .. }));
    }

    #[test]
    fn test_stale_lock_refuses_until_removed() {
        let git_dir = TempDir::new().unwrap();
        let stale = git_dir.path().join(LOCK_FILE);
        std::fs::write(&stale, "12345\n").unwrap();

        assert!(matches!(
            RepoLock::acquire(git_dir.path()),
            Err(Error::LockHeld { .. })
        ));

        std::fs::remove_file(&stale).unwrap();
        assert!(RepoLock::acquire(git_dir.path()).is_ok());
    }
}
