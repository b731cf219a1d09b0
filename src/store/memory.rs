//! In-memory backend
//!
//! Reference implementation of `DbInterface` over a `MemTable`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::MissingKeyPolicy;
use crate::error::{KvError, Result};
use crate::memtable::MemTable;

use super::{DbInterface, HandleState};

/// Store that keeps everything in an ordered in-memory table
///
/// `open` only records the path; nothing is read or written on disk and
/// the `sync` flag has no effect. Contents are dropped on `close`.
pub struct MemStore {
    state: HandleState,
    table: MemTable,
    missing_key_policy: MissingKeyPolicy,
    path: Option<PathBuf>,
}

impl MemStore {
    pub fn new(missing_key_policy: MissingKeyPolicy) -> Self {
        Self {
            state: HandleState::Unopened,
            table: MemTable::new(),
            missing_key_policy,
            path: None,
        }
    }

    /// Path given to `open`, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new(MissingKeyPolicy::Error)
    }
}

impl DbInterface for MemStore {
    fn open(&mut self, path: &Path, sync: bool) -> Result<()> {
        self.state.ensure_openable()?;
        self.path = Some(path.to_path_buf());
        self.state = HandleState::Opened;
        debug!(path = %path.display(), sync, "memory store opened");
        Ok(())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.state.ensure_opened()?;
        self.table.put(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.state.ensure_opened()?;
        self.table.get(key).ok_or(KvError::KeyNotFound)
    }

    fn del(&self, key: &[u8]) -> Result<()> {
        self.state.ensure_opened()?;
        match (self.table.remove(key), self.missing_key_policy) {
            (Some(_), _) | (None, MissingKeyPolicy::Ignore) => Ok(()),
            (None, MissingKeyPolicy::Error) => Err(KvError::KeyNotFound),
        }
    }

    fn get_all(&self) -> Result<usize> {
        self.state.ensure_opened()?;
        Ok(self.table.scan_count())
    }

    fn close(&mut self) -> Result<()> {
        self.state.ensure_opened()?;
        let entries = self.table.len();
        self.table.clear();
        self.state = HandleState::Closed;
        debug!(entries, "memory store closed");
        Ok(())
    }

    fn state(&self) -> HandleState {
        self.state
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
