//! Tests for LogStore
//!
//! These tests verify:
//! - Data survives close and reopen on a fresh handle
//! - Directory locking
//! - Recovery from a damaged log tail
//! - Compaction (explicit and on open)
//! - Dropping an open handle keeps written data
//! - A failed log write leaves the table untouched

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use kvbench::codec::integer_to_binary;
use kvbench::config::{BackendKind, Config, WalSyncStrategy};
use kvbench::store::{DbInterface, LogStore};
use kvbench::wal::WalRecovery;
use kvbench::KvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn log_config() -> Config {
    Config::builder()
        .backend(BackendKind::Log)
        .wal_sync_strategy(WalSyncStrategy::EveryNEntries { count: 10 })
        .build()
}

fn open_store(dir: &Path, sync: bool) -> LogStore {
    let mut db = LogStore::new(log_config());
    db.open(dir, sync).unwrap();
    db
}

fn open_store_with(config: Config, dir: &Path) -> LogStore {
    let mut db = LogStore::new(config);
    db.open(dir, true).unwrap();
    db
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_directory_and_files() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("nested").join("store");

    let db = open_store(&dir, true);

    assert!(dir.is_dir());
    assert!(dir.join("LOCK").exists());
    assert!(LogStore::wal_path(&dir).exists());
    assert_eq!(db.dir(), Some(dir.as_path()));
}

#[test]
fn test_second_handle_is_locked_out() {
    let temp = TempDir::new().unwrap();
    let mut first = open_store(temp.path(), true);

    let mut second = LogStore::new(log_config());
    let result = second.open(temp.path(), true);
    assert!(matches!(result, Err(KvError::Locked(_))));

    // Lock is released by close
    first.close().unwrap();
    second.open(temp.path(), true).unwrap();
    second.close().unwrap();
}

#[test]
fn test_lock_released_on_drop() {
    let temp = TempDir::new().unwrap();
    {
        let _db = open_store(temp.path(), true);
    }

    let mut db = open_store(temp.path(), true);
    db.close().unwrap();
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_data_survives_reopen() {
    let temp = TempDir::new().unwrap();

    let mut db = open_store(temp.path(), true);
    for i in 0..100u64 {
        db.set(&integer_to_binary(i), format!("value{}", i).as_bytes()).unwrap();
    }
    db.del(&integer_to_binary(50)).unwrap();
    db.set(&integer_to_binary(10), b"overwritten").unwrap();
    db.close().unwrap();

    let mut db = open_store(temp.path(), true);
    assert_eq!(db.get_all().unwrap(), 99);
    assert_eq!(db.get(&integer_to_binary(10)).unwrap(), b"overwritten".to_vec());
    assert_eq!(db.get(&integer_to_binary(99)).unwrap(), b"value99".to_vec());
    assert!(db.get(&integer_to_binary(50)).unwrap_err().is_not_found());
    db.close().unwrap();
}

#[test]
fn test_unsynced_writes_survive_close() {
    let temp = TempDir::new().unwrap();

    let mut db = open_store(temp.path(), false);
    for i in 0..3u64 {
        db.set(&integer_to_binary(i), b"v").unwrap();
    }
    db.close().unwrap();

    let mut db = open_store(temp.path(), false);
    assert_eq!(db.get_all().unwrap(), 3);
    db.close().unwrap();
}

#[test]
fn test_drop_without_close_keeps_data() {
    let temp = TempDir::new().unwrap();
    {
        let db = open_store(temp.path(), false);
        db.set(&integer_to_binary(1), b"kept").unwrap();
    }

    let mut db = open_store(temp.path(), false);
    assert_eq!(db.get(&integer_to_binary(1)).unwrap(), b"kept".to_vec());
    db.close().unwrap();
}

#[test]
fn test_lsn_continues_after_reopen() {
    let temp = TempDir::new().unwrap();

    let mut db = open_store(temp.path(), true);
    db.set(b"a", b"1").unwrap();
    db.set(b"b", b"2").unwrap();
    assert_eq!(db.current_lsn().unwrap(), 2);
    db.close().unwrap();

    let mut db = open_store(temp.path(), true);
    db.set(b"c", b"3").unwrap();
    assert_eq!(db.current_lsn().unwrap(), 3);
    db.close().unwrap();
}

#[test]
fn test_missing_delete_is_not_logged() {
    let temp = TempDir::new().unwrap();

    let mut db = open_store(temp.path(), true);
    db.set(b"a", b"1").unwrap();
    assert!(db.del(b"missing").unwrap_err().is_not_found());
    assert_eq!(db.current_lsn().unwrap(), 1);
    db.close().unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn test_failed_log_write_is_not_applied() {
    let full = Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let temp = TempDir::new().unwrap();
    std::os::unix::fs::symlink(full, LogStore::wal_path(temp.path())).unwrap();

    let db = open_store(temp.path(), true);

    assert!(db.set(b"a", b"1").is_err());
    assert!(db.get(b"a").unwrap_err().is_not_found());
    assert_eq!(db.get_all().unwrap(), 0);
    assert_eq!(db.current_lsn().unwrap(), 0);

    assert!(db.set(b"b", b"2").is_err());
    assert_eq!(db.current_lsn().unwrap(), 0);
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_open_recovers_from_torn_tail() {
    let temp = TempDir::new().unwrap();

    let mut db = open_store(temp.path(), true);
    for i in 0..5u64 {
        db.set(&integer_to_binary(i), b"v").unwrap();
    }
    db.close().unwrap();

    // Half-written record from a crash
    let wal_path = LogStore::wal_path(temp.path());
    let mut file = OpenOptions::new().append(true).open(&wal_path).unwrap();
    file.write_all(&[0x06, 0, 0, 0, 0, 0, 0, 0, 0xaa, 0xbb]).unwrap();
    drop(file);

    let mut db = open_store(temp.path(), true);
    assert_eq!(db.get_all().unwrap(), 5);

    db.set(&integer_to_binary(5), b"v").unwrap();
    db.close().unwrap();

    let result = WalRecovery::verify(&wal_path).unwrap();
    assert_eq!(result.entries_corrupted, 0);
    assert_eq!(result.entries_recovered, 6);
}

// =============================================================================
// Compaction Tests
// =============================================================================

#[test]
fn test_compact_keeps_only_live_entries() {
    let temp = TempDir::new().unwrap();
    let wal_path = LogStore::wal_path(temp.path());

    let mut db = open_store(temp.path(), true);
    for round in 0..5u64 {
        for i in 0..20u64 {
            db.set(&integer_to_binary(i), format!("r{}", round).as_bytes()).unwrap();
        }
    }
    assert_eq!(WalRecovery::verify(&wal_path).unwrap().entries_recovered, 100);

    db.compact().unwrap();

    assert_eq!(WalRecovery::verify(&wal_path).unwrap().entries_recovered, 20);
    assert_eq!(db.get(&integer_to_binary(3)).unwrap(), b"r4".to_vec());

    // Writes after compaction land in the new log
    db.set(&integer_to_binary(100), b"after").unwrap();
    db.close().unwrap();

    let mut db = open_store(temp.path(), true);
    assert_eq!(db.get_all().unwrap(), 21);
    assert_eq!(db.get(&integer_to_binary(100)).unwrap(), b"after".to_vec());
    db.close().unwrap();
}

#[test]
fn test_open_compacts_mostly_dead_log() {
    let temp = TempDir::new().unwrap();
    let wal_path = LogStore::wal_path(temp.path());
    let config = Config::builder()
        .backend(BackendKind::Log)
        .compaction_threshold(0.5)
        .build();

    let mut db = open_store_with(config.clone(), temp.path());
    for i in 0..10u64 {
        db.set(&integer_to_binary(i), b"v").unwrap();
    }
    for i in 0..8u64 {
        db.del(&integer_to_binary(i)).unwrap();
    }
    db.close().unwrap();
    let before = fs::metadata(&wal_path).unwrap().len();

    let mut db = open_store_with(config, temp.path());

    assert_eq!(db.get_all().unwrap(), 2);
    assert_eq!(WalRecovery::verify(&wal_path).unwrap().entries_recovered, 2);
    assert!(fs::metadata(&wal_path).unwrap().len() < before);
    db.close().unwrap();
}

#[test]
fn test_open_skips_compaction_below_threshold() {
    let temp = TempDir::new().unwrap();
    let wal_path = LogStore::wal_path(temp.path());

    let mut db = open_store(temp.path(), true);
    for i in 0..10u64 {
        db.set(&integer_to_binary(i), b"v").unwrap();
    }
    db.del(&integer_to_binary(0)).unwrap();
    db.close().unwrap();

    let mut db = open_store(temp.path(), true);
    assert_eq!(WalRecovery::verify(&wal_path).unwrap().entries_recovered, 11);
    db.close().unwrap();
}

#[test]
fn test_compact_repeatedly_then_write() {
    let temp = TempDir::new().unwrap();
    let compact_path = temp.path().join("kv.log.compact");

    let db = open_store(temp.path(), true);
    for i in 0..10u64 {
        db.set(&integer_to_binary(i), b"v").unwrap();
    }
    db.compact().unwrap();
    db.set(&integer_to_binary(0), b"again").unwrap();
    db.compact().unwrap();

    assert!(!compact_path.exists());
    assert_eq!(db.current_lsn().unwrap(), 10);

    db.set(&integer_to_binary(10), b"v").unwrap();
    assert_eq!(db.current_lsn().unwrap(), 11);
    drop(db);

    let mut db = open_store(temp.path(), true);
    assert_eq!(db.get_all().unwrap(), 11);
    assert_eq!(db.get(&integer_to_binary(0)).unwrap(), b"again".to_vec());
    db.close().unwrap();

    let result = WalRecovery::verify(&LogStore::wal_path(temp.path())).unwrap();
    assert_eq!(result.entries_recovered, 11);
    assert_eq!(result.entries_corrupted, 0);
}

#[test]
fn test_writes_after_compaction_on_open_persist() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .backend(BackendKind::Log)
        .compaction_threshold(0.5)
        .build();

    let mut db = open_store_with(config.clone(), temp.path());
    for i in 0..4u64 {
        db.set(&integer_to_binary(i), b"v").unwrap();
    }
    for i in 0..3u64 {
        db.del(&integer_to_binary(i)).unwrap();
    }
    db.close().unwrap();

    let mut db = open_store_with(config.clone(), temp.path());
    assert_eq!(db.current_lsn().unwrap(), 1);
    db.set(&integer_to_binary(20), b"new").unwrap();
    db.close().unwrap();

    let mut db = open_store_with(config, temp.path());
    assert_eq!(db.get_all().unwrap(), 2);
    assert_eq!(db.get(&integer_to_binary(20)).unwrap(), b"new".to_vec());
    db.close().unwrap();
}

#[test]
fn test_compact_on_closed_handle_fails() {
    let temp = TempDir::new().unwrap();
    let mut db = open_store(temp.path(), true);
    db.close().unwrap();

    assert!(db.compact().unwrap_err().is_closed());
}
