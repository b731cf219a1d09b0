//! MemTable Module
//!
//! Ordered in-memory table shared by every backend.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Multi-reader / single-writer access through an internal RwLock
//! - Track approximate size and entry count
//! - Ordered iteration (binary keys come out in numeric order)
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock:
//! - Ordered keys, so a full scan visits binary keys in numeric order
//! - Simple and correct first
//! - Future: Consider SkipList for better concurrent performance

mod table;

pub use table::MemTable;
