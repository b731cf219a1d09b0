//! WAL Writer
//!
//! Handles appending entries to the WAL file.
//!
//! Appended entries are staged in memory and reach the file only through
//! `sync`, which writes and fsyncs them together. If either step fails the
//! file is cut back to its last synced length, so a failed append never
//! leaves a torn frame behind, and the rejected entry is dropped from the
//! stage. Entries appended successfully before the failure stay staged for
//! the next `sync`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::error;

use crate::config::WalSyncStrategy;
use crate::error::{KvError, Result};
use super::{Operation, WalEntry};

/// Writes entries to the WAL file
pub struct WalWriter {
    /// Log file path
    path: PathBuf,

    /// Append handle
    file: File,

    /// Encoded entries not yet written to the file
    pending: Vec<u8>,

    /// File length covered by the last successful sync
    synced_len: u64,

    /// LSN handed to the next appended entry
    next_lsn: u64,

    /// When to fsync
    sync_strategy: WalSyncStrategy,

    /// Entries appended since the last sync
    unsynced: usize,

    /// Set when a failed write could not be rolled back
    poisoned: bool,
}

impl WalWriter {
    /// Open or create a WAL file for appending
    ///
    /// `next_lsn` continues the sequence of an existing log (use
    /// `RecoveryResult::last_lsn + 1`).
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy, next_lsn: u64) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let synced_len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            pending: Vec::new(),
            synced_len,
            next_lsn: next_lsn.max(1),
            sync_strategy,
            unsynced: 0,
            poisoned: false,
        })
    }

    /// Append an operation to the WAL, returning its LSN
    ///
    /// On error nothing of this entry remains: its LSN is reused by the next
    /// append and it will not be written by a later sync.
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        self.ensure_usable()?;

        let lsn = self.next_lsn;
        let bytes = WalEntry::new(lsn, operation).serialize()?;

        let mark = self.pending.len();
        self.pending.extend_from_slice(&bytes);

        let needs_sync = match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced + 1 >= count,
        };

        if needs_sync {
            if let Err(e) = self.sync() {
                // sync kept the stage intact; drop only the rejected entry
                self.pending.truncate(mark);
                return Err(e);
            }
        } else {
            self.unsynced += 1;
        }

        self.next_lsn += 1;
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.ensure_usable()?;
        if self.pending.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.write_pending() {
            self.rollback();
            return Err(e.into());
        }

        self.synced_len += self.pending.len() as u64;
        self.pending.clear();
        self.unsynced = 0;
        Ok(())
    }

    /// Move the log file to `to`, keeping this handle writing to it
    ///
    /// The directory entry is not durable until `sync_parent_dir` runs.
    pub fn rename_to(&mut self, to: &Path) -> Result<()> {
        fs::rename(&self.path, to)?;
        self.path = to.to_path_buf();
        Ok(())
    }

    /// Change when appends are fsynced
    pub fn set_sync_strategy(&mut self, strategy: WalSyncStrategy) {
        self.sync_strategy = strategy;
    }

    /// Get the LSN of the last appended entry (0 if none)
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn - 1
    }

    /// Entries appended but not yet synced
    pub fn unsynced(&self) -> usize {
        self.unsynced
    }

    /// True once a failed write could not be undone; every call fails afterwards
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn ensure_usable(&self) -> Result<()> {
        if self.poisoned {
            return Err(KvError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("WAL writer for {} is poisoned", self.path.display()),
            )));
        }
        Ok(())
    }

    fn write_pending(&mut self) -> io::Result<()> {
        self.file.write_all(&self.pending)?;
        self.file.sync_data()
    }

    /// Cut the file back to the last synced length
    fn rollback(&mut self) {
        let synced_len = self.synced_len;
        let file = &self.file;
        let restored = file.metadata().and_then(|meta| {
            if meta.len() > synced_len {
                file.set_len(synced_len)?;
                file.sync_data()?;
            }
            Ok(())
        });

        if let Err(e) = restored {
            error!(path = %self.path.display(), error = %e, "WAL rollback failed");
            self.poisoned = true;
        }
    }
}

/// Fsync the directory holding `path` so a rename or create survives a crash
#[cfg(unix)]
pub fn sync_parent_dir(path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()?;
    Ok(())
}

/// Directories cannot be opened for fsync here; rename durability is left
/// to the filesystem
#[cfg(not(unix))]
pub fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

impl Drop for WalWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() && !self.poisoned {
            if let Err(e) = self.sync() {
                error!(path = %self.path.display(), error = %e, "failed to sync WAL on drop");
            }
        }
    }
}
