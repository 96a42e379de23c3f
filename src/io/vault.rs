use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::io::atomic::atomic_write;
use crate::io::host::{
    Document, DocumentHost, HostError, Selection, TextRange, byte_span, find_text, line_of, splice,
};
use crate::io::lock::{DEFAULT_LOCK_TIMEOUT, NoteLock};

/// Notes stored as files under a root directory.
///
/// Every write takes the note's advisory lock, re-reads the file, and
/// replaces it atomically, so concurrent writers never interleave inside
/// one note.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
    lock_timeout: Duration,
    selection: Option<Selection>,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsVault {
            root: root.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            selection: None,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The most recent selection made with `select_text`
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn read_text(&self, path: &str) -> Result<String, HostError> {
        let full = self.full_path(path);
        fs::read_to_string(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HostError::NotFound {
                    path: path.to_string(),
                }
            } else {
                HostError::Read {
                    path: path.to_string(),
                    source: e,
                }
            }
        })
    }

    /// Read, transform and write back one note while holding its lock
    fn rewrite<F>(&self, path: &str, edit: F) -> Result<(), HostError>
    where
        F: FnOnce(&str) -> Result<String, HostError>,
    {
        let full = self.full_path(path);
        let _lock = NoteLock::acquire(&full, self.lock_timeout)?;

        let current = self.read_text(path)?;
        let updated = edit(&current)?;
        if updated == current {
            debug!(path, "note unchanged, skipping write");
            return Ok(());
        }

        atomic_write(&full, updated.as_bytes()).map_err(|e| HostError::Write {
            path: path.to_string(),
            source: e,
        })?;
        debug!(path, bytes = updated.len(), "note written");
        Ok(())
    }
}

impl DocumentHost for FsVault {
    fn read_document(&self, path: &str) -> Result<Document, HostError> {
        Ok(Document::new(self.read_text(path)?))
    }

    fn mutate_document<F>(&mut self, path: &str, edit: F) -> Result<(), HostError>
    where
        F: FnOnce(&str) -> String,
    {
        self.rewrite(path, |current| Ok(edit(current)))
    }

    fn get_line(&self, path: &str, line: usize) -> Result<String, HostError> {
        line_of(&self.read_text(path)?, path, line)
    }

    fn replace_range(&mut self, path: &str, range: TextRange, text: &str) -> Result<(), HostError> {
        self.rewrite(path, |current| splice(current, path, range, text))
    }

    fn select_text(&mut self, path: &str, text: &str) -> Result<TextRange, HostError> {
        let current = self.read_text(path)?;
        let range = find_text(&current, text).ok_or_else(|| HostError::TextNotFound {
            path: path.to_string(),
            text: text.to_string(),
        })?;
        self.selection = Some(Selection {
            path: path.to_string(),
            range,
        });
        Ok(range)
    }

    fn select_range(&mut self, path: &str, range: TextRange) -> Result<(), HostError> {
        byte_span(&self.read_text(path)?, path, range)?;
        self.selection = Some(Selection {
            path: path.to_string(),
            range,
        });
        Ok(())
    }
}
