//! Log-backed backend
//!
//! Coordinates the WAL and a MemTable behind the `DbInterface` contract.
//!
//! ## Responsibilities
//! - Own the store directory exclusively while open
//! - Recover and replay the WAL on open
//! - Log every mutation before applying it to the table
//! - Rewrite the log when most of it is dead records

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{Config, MissingKeyPolicy, WalSyncStrategy};
use crate::error::{KvError, Result};
use crate::memtable::MemTable;
use crate::wal::{sync_parent_dir, Operation, WalRecovery, WalWriter};

use super::{DbInterface, HandleState};

/// Durable store: every mutation is appended to `kv.log` before it becomes
/// visible in the in-memory table
///
/// ## Concurrency Model
/// - **Writes** (set/del): serialized by the WAL mutex, which is held
///   while the table is updated so log order equals apply order
/// - **Reads** (get/get_all): concurrent through the table's RwLock
pub struct LogStore {
    /// Store configuration (policies, sync strategy, compaction threshold)
    config: Config,

    /// Lifecycle state
    state: HandleState,

    /// Resources held while `Opened`
    inner: Option<OpenedLog>,
}

/// Resources owned by an open `LogStore`
struct OpenedLog {
    /// Store directory
    dir: PathBuf,

    /// Write-ahead log (exclusive access needed)
    wal: Mutex<WalWriter>,

    /// Live entries (internal RwLock)
    table: MemTable,

    /// Holds the exclusive lock on `LOCK` for as long as it is alive
    lock_file: File,

    /// Strategy the WAL was opened with
    sync_strategy: WalSyncStrategy,
}

impl LogStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const WAL_FILENAME: &'static str = "kv.log";
    const COMPACT_FILENAME: &'static str = "kv.log.compact";
    const LOCK_FILENAME: &'static str = "LOCK";

    /// Create an unopened store
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: HandleState::Unopened,
            inner: None,
        }
    }

    /// Rewrite the log so it holds exactly one `Put` per live key
    ///
    /// The new log is written next to the old one, synced, then renamed
    /// over it. The directory is fsynced once the new writer is in place.
    pub fn compact(&self) -> Result<()> {
        let inner = self.opened()?;
        let mut wal = inner.wal.lock();
        wal.sync()?;

        let live = inner.table.len();
        *wal = Self::rewrite_log(&inner.dir, &inner.table, inner.sync_strategy)?;
        sync_parent_dir(wal.path())?;

        info!(dir = %inner.dir.display(), live, "log compacted");
        Ok(())
    }

    /// Directory this store was opened on
    pub fn dir(&self) -> Option<&Path> {
        self.inner.as_ref().map(|inner| inner.dir.as_path())
    }

    /// LSN of the last logged mutation
    pub fn current_lsn(&self) -> Result<u64> {
        Ok(self.opened()?.wal.lock().current_lsn())
    }

    /// Path of the WAL inside a store directory
    pub fn wal_path(dir: &Path) -> PathBuf {
        dir.join(Self::WAL_FILENAME)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn opened(&self) -> Result<&OpenedLog> {
        self.state.ensure_opened()?;
        self.inner.as_ref().ok_or(KvError::ClosedHandle)
    }

    /// Take the directory lock without blocking
    fn acquire_lock(dir: &Path) -> Result<File> {
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(dir.join(Self::LOCK_FILENAME))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| KvError::Locked(dir.to_path_buf()))?;

        Ok(lock_file)
    }

    /// Write the table to a fresh log and rename it over `kv.log`
    ///
    /// The returned writer is the one that wrote the new log, so no reopen
    /// can fail after the rename. The caller must install it before calling
    /// `sync_parent_dir`.
    fn rewrite_log(dir: &Path, table: &MemTable, strategy: WalSyncStrategy) -> Result<WalWriter> {
        let wal_path = Self::wal_path(dir);
        let compact_path = dir.join(Self::COMPACT_FILENAME);

        if compact_path.exists() {
            fs::remove_file(&compact_path)?;
        }

        let mut writer = WalWriter::open(
            &compact_path,
            WalSyncStrategy::EveryNEntries { count: usize::MAX },
            1,
        )?;
        for (key, value) in table.entries() {
            writer.append(Operation::Put { key, value })?;
        }
        writer.sync()?;

        if let Err(e) = writer.rename_to(&wal_path) {
            drop(writer);
            if let Err(cleanup) = fs::remove_file(&compact_path) {
                warn!(path = %compact_path.display(), error = %cleanup, "failed to remove compaction output");
            }
            return Err(e);
        }

        writer.set_sync_strategy(strategy);
        Ok(writer)
    }
}

impl DbInterface for LogStore {
    /// Open or create the store directory
    ///
    /// On open:
    /// 1. Create the directory and take its lock
    /// 2. Recover the WAL, truncating a damaged tail
    /// 3. Replay entries into the table
    /// 4. Compact if dead records dominate the log
    fn open(&mut self, path: &Path, sync: bool) -> Result<()> {
        self.state.ensure_openable()?;

        // Step 1: Directory and exclusive ownership
        fs::create_dir_all(path)?;
        let lock_file = Self::acquire_lock(path)?;

        // Step 2: Recover whatever the last run left behind
        let wal_path = Self::wal_path(path);
        let (entries, recovery) = WalRecovery::recover(&wal_path)?;
        if recovery.entries_corrupted > 0 {
            warn!(
                path = %wal_path.display(),
                recovered = recovery.entries_recovered,
                "WAL tail was damaged; later entries dropped"
            );
        }

        // Step 3: Replay in log order
        let table = MemTable::new();
        for entry in entries {
            match entry.operation {
                Operation::Put { key, value } => {
                    table.put(key, value);
                }
                Operation::Delete { key } => {
                    table.remove(&key);
                }
            }
        }

        // Step 4: Compact when the log is mostly dead weight
        let sync_strategy = self.config.effective_sync_strategy(sync);
        let total = recovery.entries_recovered;
        let dead = total.saturating_sub(table.len() as u64);
        let wal = if total > 0 && dead as f32 / total as f32 >= self.config.compaction_threshold {
            info!(total, dead, "compacting log on open");
            let wal = Self::rewrite_log(path, &table, sync_strategy)?;
            sync_parent_dir(wal.path())?;
            wal
        } else {
            WalWriter::open(&wal_path, sync_strategy, recovery.last_lsn + 1)?
        };

        info!(
            path = %path.display(),
            sync,
            entries = table.len(),
            last_lsn = recovery.last_lsn,
            "log store opened"
        );

        self.inner = Some(OpenedLog {
            dir: path.to_path_buf(),
            wal: Mutex::new(wal),
            table,
            lock_file,
            sync_strategy,
        });
        self.state = HandleState::Opened;
        Ok(())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let inner = self.opened()?;

        // Log first, then apply while still holding the WAL lock
        let mut wal = inner.wal.lock();
        wal.append(Operation::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        inner.table.put(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let inner = self.opened()?;
        inner.table.get(key).ok_or(KvError::KeyNotFound)
    }

    fn del(&self, key: &[u8]) -> Result<()> {
        let inner = self.opened()?;
        let mut wal = inner.wal.lock();

        if !inner.table.contains(key) {
            return match self.config.missing_key_policy {
                MissingKeyPolicy::Error => Err(KvError::KeyNotFound),
                MissingKeyPolicy::Ignore => Ok(()),
            };
        }

        wal.append(Operation::Delete { key: key.to_vec() })?;
        inner.table.remove(key);
        Ok(())
    }

    fn get_all(&self) -> Result<usize> {
        let inner = self.opened()?;
        Ok(inner.table.scan_count())
    }

    /// Sync the log and release the directory lock
    fn close(&mut self) -> Result<()> {
        self.state.ensure_opened()?;
        let inner = self.inner.take().ok_or(KvError::ClosedHandle)?;
        self.state = HandleState::Closed;

        inner.wal.lock().sync()?;
        inner.lock_file.unlock()?;

        debug!(dir = %inner.dir.display(), entries = inner.table.len(), "log store closed");
        Ok(())
    }

    fn state(&self) -> HandleState {
        self.state
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

impl Drop for LogStore {
    fn drop(&mut self) {
        // Dropping the lock file releases the directory lock
        if let Some(inner) = self.inner.take() {
            if let Err(e) = inner.wal.lock().sync() {
                warn!(dir = %inner.dir.display(), error = %e, "failed to sync log on drop");
            }
        }
    }
}
