//! Error types for kvbench
//!
//! Provides a unified error type for codec, store and harness operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvbench operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Invalid digit key {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("Binary key too short: expected at least {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Store handle is not open")]
    ClosedHandle,

    #[error("Store handle is already open")]
    AlreadyOpen,

    #[error("Store directory is locked by another handle: {0}")]
    Locked(PathBuf),

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// True when the error means "the key is absent", as opposed to a broken store
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::KeyNotFound)
    }

    /// True when the handle was used outside of its `Opened` state
    pub fn is_closed(&self) -> bool {
        matches!(self, KvError::ClosedHandle)
    }
}

impl From<bincode::Error> for KvError {
    fn from(e: bincode::Error) -> Self {
        KvError::Serialization(e.to_string())
    }
}
