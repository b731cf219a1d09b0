//! # kvbench
//!
//! Building blocks for key-value storage engines and for benchmarking them:
//! - A key codec between decimal digit text, `u64` and 8-byte big-endian
//!   binary keys (byte order equals numeric order)
//! - `DbInterface`, the capability set every backend implements
//! - An in-memory backend and a durable write-ahead-logged backend
//! - A workload runner that times each phase of a run
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Benchmark / caller                          │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ digits / u64                      │ TimeStatistics
//!            ▼                                   │
//!   ┌─────────────────┐                          │
//!   │      Codec      │ ── 8-byte BE key ──┐     │
//!   └─────────────────┘                    ▼     │
//!                           ┌──────────────────────────────┐
//!                           │   DbInterface (open/set/get/ │
//!                           │   del/get_all/close)         │
//!                           └──────┬───────────────┬───────┘
//!                                  │               │
//!                                  ▼               ▼
//!                           ┌────────────┐  ┌─────────────┐
//!                           │  MemStore  │  │  LogStore   │
//!                           └─────┬──────┘  └──┬───────┬──┘
//!                                 ▼            ▼       ▼
//!                           ┌─────────────────────┐ ┌─────┐
//!                           │      MemTable       │ │ WAL │
//!                           └─────────────────────┘ └─────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod memtable;
pub mod wal;
pub mod store;
pub mod bench;
pub mod util;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{BackendKind, Config, MissingKeyPolicy};
pub use codec::BinaryKey;
pub use store::{new_store, DbInterface, HandleState, LogStore, MemStore};
pub use bench::{Benchmark, BenchReport, TimeStatistics};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvbench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
