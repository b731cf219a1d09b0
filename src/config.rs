//! Configuration for kvbench
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvError, Result};

/// Main configuration for a store and the benchmark run driving it
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory handed to `DbInterface::open`
    /// Internal structure for the log backend:
    ///   {data_dir}/
    ///     ├── kv.log           (write-ahead log)
    ///     └── LOCK             (exclusive ownership marker)
    pub data_dir: PathBuf,

    /// Which backend `store::new_store` builds
    pub backend: BackendKind,

    /// Passed as the `sync` flag of `open`: fsync every mutation
    pub sync_writes: bool,

    /// Sync strategy used by the log backend when `sync_writes` is off
    pub wal_sync_strategy: WalSyncStrategy,

    /// What `del` does when the key is absent
    pub missing_key_policy: MissingKeyPolicy,

    /// Dead-record ratio at which the log backend rewrites its log on open
    pub compaction_threshold: f32,

    // -------------------------------------------------------------------------
    // Benchmark Configuration
    // -------------------------------------------------------------------------
    /// Number of keys written by the sequential phase
    pub key_count: u64,

    /// Length of each random value in bytes
    pub value_size: usize,

    /// Fraction of keys removed (then rewritten) by the random phases
    pub delete_ratio: f64,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

/// Available storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Ordered in-memory table, nothing touches disk
    Memory,

    /// In-memory table backed by a checksummed write-ahead log
    Log,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N uncommitted entries (balanced durability/performance)
    EveryNEntries { count: usize },
}

/// Policy for deleting a key that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// `del` fails with `KvError::KeyNotFound`
    Error,

    /// `del` succeeds without doing anything
    Ignore,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./kvbench_data"),
            backend: BackendKind::Memory,
            sync_writes: false,
            wal_sync_strategy: WalSyncStrategy::EveryNEntries { count: 100 },
            missing_key_policy: MissingKeyPolicy::Error,
            compaction_threshold: 0.6,
            key_count: 100_000,
            value_size: 100,
            delete_ratio: 0.1,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject values no run or store can work with
    pub fn validate(&self) -> Result<()> {
        if self.key_count == 0 {
            return Err(KvError::Config("key_count must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.delete_ratio) {
            return Err(KvError::Config(format!(
                "delete_ratio must be within [0, 1], got {}",
                self.delete_ratio
            )));
        }
        if !(self.compaction_threshold > 0.0 && self.compaction_threshold <= 1.0) {
            return Err(KvError::Config(format!(
                "compaction_threshold must be within (0, 1], got {}",
                self.compaction_threshold
            )));
        }
        if let WalSyncStrategy::EveryNEntries { count: 0 } = self.wal_sync_strategy {
            return Err(KvError::Config(
                "EveryNEntries sync strategy needs a count of at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The strategy the log backend actually applies for a given `sync` flag
    pub fn effective_sync_strategy(&self, sync: bool) -> WalSyncStrategy {
        if sync {
            WalSyncStrategy::EveryWrite
        } else {
            self.wal_sync_strategy
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the backend
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Enable or disable synchronous writes
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    /// Set the missing-key delete policy
    pub fn missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.config.missing_key_policy = policy;
        self
    }

    /// Set the compaction threshold
    pub fn compaction_threshold(mut self, ratio: f32) -> Self {
        self.config.compaction_threshold = ratio;
        self
    }

    /// Set the number of benchmark keys
    pub fn key_count(mut self, count: u64) -> Self {
        self.config.key_count = count;
        self
    }

    /// Set the benchmark value size (in bytes)
    pub fn value_size(mut self, size: usize) -> Self {
        self.config.value_size = size;
        self
    }

    /// Set the benchmark delete ratio
    pub fn delete_ratio(mut self, ratio: f64) -> Self {
        self.config.delete_ratio = ratio;
        self
    }

    /// Set the RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
