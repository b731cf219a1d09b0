//! Store Module
//!
//! The capability set every key-value backend implements, plus the
//! backends shipped with this crate.
//!
//! ## Handle Lifecycle
//! ```text
//!   Unopened ──open()──▶ Opened ──close()──▶ Closed
//!                          │
//!                set / get / del / get_all
//! ```
//! Data operations are valid only while `Opened`; anything else fails with
//! `KvError::ClosedHandle`. A closed handle never reopens; build a new one.
//!
//! ## Backends
//! - `MemStore`: ordered in-memory table, no disk I/O
//! - `LogStore`: in-memory table backed by a checksummed write-ahead log
//!
//! Both are `Send + Sync`. `set`, `get`, `del` and `get_all` may be called
//! from many threads on one handle; a `set` that has returned is visible to
//! every later `get`, from any thread.

mod log;
mod memory;

use std::path::Path;

use crate::config::{BackendKind, Config};
use crate::error::{KvError, Result};

pub use self::log::LogStore;
pub use self::memory::MemStore;

/// Storage-engine contract consumed by callers regardless of backend
///
/// Keys and values are opaque bytes. Callers that use numeric keys pass
/// the 8-byte big-endian form from `codec::integer_to_binary`.
pub trait DbInterface: Send + Sync {
    /// Acquire the backend's storage at `path`
    ///
    /// With `sync` set, every mutating call is durable before it returns.
    fn open(&mut self, path: &Path, sync: bool) -> Result<()>;

    /// Insert or overwrite `value` under `key`
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Look up `key`; `KvError::KeyNotFound` when absent
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Remove `key`
    ///
    /// An absent key is handled according to the handle's
    /// `MissingKeyPolicy`.
    fn del(&self, key: &[u8]) -> Result<()>;

    /// Walk every entry and return how many were visited
    fn get_all(&self) -> Result<usize>;

    /// Release all resources; the handle is unusable afterwards
    fn close(&mut self) -> Result<()>;

    /// Current lifecycle state
    fn state(&self) -> HandleState;

    /// Short backend name for logs and reports
    fn name(&self) -> &'static str;
}

/// Lifecycle state of a store handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unopened,
    Opened,
    Closed,
}

impl HandleState {
    /// Ok only while `Opened`
    pub fn ensure_opened(self) -> Result<()> {
        match self {
            HandleState::Opened => Ok(()),
            HandleState::Unopened | HandleState::Closed => Err(KvError::ClosedHandle),
        }
    }

    /// Ok only for a fresh handle
    pub fn ensure_openable(self) -> Result<()> {
        match self {
            HandleState::Unopened => Ok(()),
            HandleState::Opened => Err(KvError::AlreadyOpen),
            HandleState::Closed => Err(KvError::ClosedHandle),
        }
    }
}

/// Creates a new, unopened store for the configured backend
pub fn new_store(config: &Config) -> Box<dyn DbInterface> {
    match config.backend {
        BackendKind::Memory => Box::new(MemStore::new(config.missing_key_policy)),
        BackendKind::Log => Box::new(LogStore::new(config.clone())),
    }
}

/// Open `store`, run `f`, and close it again whatever `f` returned
///
/// The first error wins: an error from `f` is returned even if `close`
/// fails too.
pub fn scoped<S, F, T>(store: &mut S, path: &Path, sync: bool, f: F) -> Result<T>
where
    S: DbInterface + ?Sized,
    F: FnOnce(&S) -> Result<T>,
{
    store.open(path, sync)?;
    let result = f(&*store);
    let closed = store.close();

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e),
    }
}
