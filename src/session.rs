//! Exclusive session lock over a record directory.
//!
//! Every mutation rewrites whole records, so two concurrent sessions would
//! silently clobber each other. The lock file holds the owning PID; a lock
//! whose process has exited is reclaimed.

use eyre::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lock file name within the record directory.
const LOCK_FILE: &str = ".session.lock";

/// Held for the lifetime of a session; dropping it releases the lock.
pub struct SessionLock {
    path: PathBuf,
}

impl SessionLock {
    /// Take the lock for this process, reclaiming it when the recorded
    /// holder is no longer alive.
    pub fn acquire(root: &Path) -> Result<SessionLock> {
        let path = root.join(LOCK_FILE);
        if let Some(lock) = Self::try_create(&path)? {
            return Ok(lock);
        }
        if Self::holder_alive(&path) {
            eyre::bail!(
                "another session is using this directory (lock at {})",
                path.display()
            );
        }
        log::info!("Removing stale session lock: {}", path.display());
        if !Self::steal_stale(&path) {
            eyre::bail!("session lock contested; try again");
        }
        match Self::try_create(&path)? {
            Some(lock) => Ok(lock),
            None => Err(eyre::eyre!("session lock contested; try again")),
        }
    }

    /// Move the stale lock aside, then delete it. Rename is atomic: of two
    /// processes reclaiming at once, one gets the file and the loser never
    /// touches the shared path. A lock found live after the move (created
    /// in the gap since the liveness check) is moved straight back.
    fn steal_stale(path: &Path) -> bool {
        let aside = path.with_file_name(format!("{}.{}", LOCK_FILE, std::process::id()));
        if fs::rename(path, &aside).is_err() {
            return false;
        }
        if Self::holder_alive(&aside) {
            fs::rename(&aside, path).ok();
            return false;
        }
        fs::remove_file(&aside).ok();
        true
    }

    fn try_create(path: &Path) -> Result<Option<SessionLock>> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                write!(file, "{}", std::process::id())
                    .context("Failed to write session lock")?;
                file.sync_all().context("Failed to sync session lock")?;
                Ok(Some(SessionLock {
                    path: path.to_path_buf(),
                }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e).context("Failed to create session lock"),
        }
    }

    fn holder_alive(path: &Path) -> bool {
        if let Ok(pid_str) = fs::read_to_string(path)
            && let Ok(pid) = pid_str.trim().parse::<i32>()
        {
            // Signal 0 doesn't send a signal but checks process existence
            unsafe {
                return libc::kill(pid, 0) == 0;
            }
        }
        // Unreadable or garbled lock counts as stale
        false
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        fs::remove_file(&self.path).ok();
    }
}
