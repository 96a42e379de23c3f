use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::trace;

/// How long a writer waits for a busy note before giving up
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Advisory lock held while one note is rewritten.
///
/// The lock lives on a hidden sibling file (`.name.md.lock`) so the note
/// itself can be replaced by rename while the lock is held. Released on drop.
#[derive(Debug)]
pub struct NoteLock {
    _file: File,
    path: PathBuf,
}

/// Error type for note locking
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("note is busy, gave up on {path} after {waited:?}")]
    Busy { path: PathBuf, waited: Duration },
    #[error("could not lock {path}: {source}")]
    Flock {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `notes/2026-10-17.md` → `notes/.2026-10-17.md.lock`
pub fn lock_path_for(note: &Path) -> PathBuf {
    let name = note
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    note.with_file_name(format!(".{}.lock", name))
}

impl NoteLock {
    /// Lock `note`, polling until `timeout` runs out.
    pub fn acquire(note: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path_for(note);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let started = Instant::now();
        while !try_lock(&file).map_err(|source| LockError::Flock {
            path: path.clone(),
            source,
        })? {
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(LockError::Busy { path, waited });
            }
            trace!(path = %path.display(), "note locked elsewhere, waiting");
            std::thread::sleep(POLL_INTERVAL);
        }

        Ok(NoteLock { _file: file, path })
    }

    pub fn acquire_default(note: &Path) -> Result<Self, LockError> {
        Self::acquire(note, DEFAULT_LOCK_TIMEOUT)
    }
}

impl Drop for NoteLock {
    fn drop(&mut self) {
        // flock goes away with the descriptor
        let _ = fs::remove_file(&self.path);
    }
}

/// Non-blocking exclusive flock. `Ok(false)` means another holder has it.
#[cfg(unix)]
fn try_lock(file: &File) -> std::io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        return Ok(true);
    }
    let err = std::io::Error::last_os_error();
    if err.kind() == std::io::ErrorKind::WouldBlock {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> std::io::Result<bool> {
    // No flock here; writers rely on the atomic rename alone
    Ok(true)
}
