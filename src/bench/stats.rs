//! Benchmark timing record

use std::fmt;
use std::time::Duration;

/// Timings of one benchmark run
///
/// Built once by `Benchmark::run`; read-only afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeStatistics {
    sequential_write: Duration,
    random_read: Duration,
    random_delete: Duration,
    random_write: Duration,
    get_all: Duration,
    total: Duration,
}

impl TimeStatistics {
    pub fn new(
        sequential_write: Duration,
        random_read: Duration,
        random_delete: Duration,
        random_write: Duration,
        get_all: Duration,
        total: Duration,
    ) -> Self {
        Self {
            sequential_write,
            random_read,
            random_delete,
            random_write,
            get_all,
            total,
        }
    }

    pub fn sequential_write(&self) -> Duration {
        self.sequential_write
    }

    pub fn random_read(&self) -> Duration {
        self.random_read
    }

    pub fn random_delete(&self) -> Duration {
        self.random_delete
    }

    pub fn random_write(&self) -> Duration {
        self.random_write
    }

    pub fn get_all(&self) -> Duration {
        self.get_all
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Label/duration pairs in report order
    pub fn rows(&self) -> [(&'static str, Duration); 6] {
        [
            ("seque write cost time:", self.sequential_write),
            ("rand read cost time:", self.random_read),
            ("rand del cost time:", self.random_delete),
            ("rand write cost:", self.random_write),
            ("getall cost:", self.get_all),
            ("total cost:", self.total),
        ]
    }
}

impl fmt::Display for TimeStatistics {
    /// One line per phase, labels padded to 30 columns
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (label, elapsed) in self.rows() {
            writeln!(f, "{:<30}{:?}", label, elapsed)?;
        }
        Ok(())
    }
}
