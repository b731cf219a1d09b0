//! Benchmark Module
//!
//! Drives any `DbInterface` backend through a fixed workload and times
//! each phase.
//!
//! ## Phases
//! 1. Sequential write: keys `0..key_count` in order, random values
//! 2. Random read: every key once, shuffled
//! 3. Random delete: `delete_ratio * key_count` distinct keys, shuffled
//! 4. Random write: the deleted keys again, reshuffled
//! 5. Get-all: full scan, expected to visit `key_count` entries

mod stats;

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::codec::{integer_to_binary, BinaryKey};
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::store::DbInterface;
use crate::util::rand_kv::random_string_with;

pub use stats::TimeStatistics;

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct BenchReport {
    /// Phase timings
    pub stats: TimeStatistics,

    /// Entry count reported by the final `get_all`
    pub entries: usize,

    /// Keys deleted (and rewritten) by phases 3 and 4
    pub deleted: usize,
}

/// Workload runner
pub struct Benchmark {
    key_count: usize,
    value_size: usize,
    delete_ratio: f64,
    seed: Option<u64>,
}

impl Benchmark {
    /// Build a runner from the benchmark half of `config`
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let key_count = usize::try_from(config.key_count).map_err(|_| {
            KvError::Config(format!("key_count {} does not fit in memory", config.key_count))
        })?;

        Ok(Self {
            key_count,
            value_size: config.value_size,
            delete_ratio: config.delete_ratio,
            seed: config.seed,
        })
    }

    /// Run every phase against an opened store
    ///
    /// The store is left open and holds `key_count` entries afterwards.
    pub fn run(&self, store: &dyn DbInterface) -> Result<BenchReport> {
        store.state().ensure_opened()?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let keys: Vec<BinaryKey> = (0..self.key_count as u64).map(integer_to_binary).collect();
        let mut order: Vec<usize> = (0..self.key_count).collect();
        let total_start = Instant::now();

        // Phase 1: sequential write
        let start = Instant::now();
        for key in &keys {
            store.set(key, &random_string_with(&mut rng, self.value_size))?;
        }
        let sequential_write = start.elapsed();
        debug!(backend = store.name(), ?sequential_write, "sequential write done");

        // Phase 2: random read
        order.shuffle(&mut rng);
        let start = Instant::now();
        for &i in &order {
            store.get(&keys[i])?;
        }
        let random_read = start.elapsed();
        debug!(backend = store.name(), ?random_read, "random read done");

        // Phase 3: random delete
        let delete_count = ((self.key_count as f64) * self.delete_ratio).round() as usize;
        order.shuffle(&mut rng);
        let mut victims = order[..delete_count.min(self.key_count)].to_vec();
        let start = Instant::now();
        for &i in &victims {
            store.del(&keys[i])?;
        }
        let random_delete = start.elapsed();
        debug!(backend = store.name(), ?random_delete, deleted = victims.len(), "random delete done");

        // Phase 4: random write
        victims.shuffle(&mut rng);
        let start = Instant::now();
        for &i in &victims {
            store.set(&keys[i], &random_string_with(&mut rng, self.value_size))?;
        }
        let random_write = start.elapsed();
        debug!(backend = store.name(), ?random_write, "random write done");

        // Phase 5: full scan
        let start = Instant::now();
        let entries = store.get_all()?;
        let get_all = start.elapsed();

        let stats = TimeStatistics::new(
            sequential_write,
            random_read,
            random_delete,
            random_write,
            get_all,
            total_start.elapsed(),
        );

        info!(
            backend = store.name(),
            keys = self.key_count,
            entries,
            total = ?stats.total(),
            "benchmark finished"
        );

        Ok(BenchReport {
            stats,
            entries,
            deleted: victims.len(),
        })
    }
}
