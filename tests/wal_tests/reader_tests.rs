//! Tests for WAL Reader
//!
//! These tests verify:
//! - Entries read back in LSN order
//! - Clean end of file vs. torn frames
//! - Position tracks the last complete entry

use std::fs::{self, OpenOptions};
use std::io::Write;

use kvbench::config::WalSyncStrategy;
use kvbench::wal::{Operation, WalEntry, WalReader, WalWriter};
use kvbench::KvError;

use crate::{put, setup_temp_wal, write_entries};

#[test]
fn test_append_and_read() {
    let (_temp, path) = setup_temp_wal();

    {
        let mut writer = WalWriter::open(&path, WalSyncStrategy::EveryWrite, 1).unwrap();
        assert_eq!(writer.current_lsn(), 0);
        assert_eq!(writer.append(put(b"a", b"1")).unwrap(), 1);
        assert_eq!(writer.append(Operation::Delete { key: b"a".to_vec() }).unwrap(), 2);
        assert_eq!(writer.current_lsn(), 2);
    }

    let entries: Vec<WalEntry> = WalReader::open(&path)
        .unwrap()
        .entries()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].lsn, 1);
    assert_eq!(entries[0].operation, put(b"a", b"1"));
    assert_eq!(entries[1].lsn, 2);
    assert_eq!(entries[1].key(), b"a");
}

#[test]
fn test_empty_log_reads_nothing() {
    let (_temp, path) = setup_temp_wal();
    fs::write(&path, b"").unwrap();

    let mut reader = WalReader::open(&path).unwrap();
    assert!(reader.next_entry().unwrap().is_none());
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_position_stops_before_torn_frame() {
    let (_temp, path) = setup_temp_wal();
    write_entries(&path, 2);
    let clean_len = fs::metadata(&path).unwrap().len();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x03, 0, 0, 0, 0, 0, 0, 0, 0x11]).unwrap();
    drop(file);

    let mut reader = WalReader::open(&path).unwrap();
    assert_eq!(reader.next_entry().unwrap().unwrap().lsn, 1);
    assert_eq!(reader.next_entry().unwrap().unwrap().lsn, 2);
    assert!(matches!(reader.next_entry(), Err(KvError::WalCorruption(_))));
    assert_eq!(reader.position(), clean_len);
}

#[test]
fn test_iterator_stops_after_error() {
    let (_temp, path) = setup_temp_wal();
    write_entries(&path, 1);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"junk").unwrap();
    drop(file);

    let results: Vec<_> = WalReader::open(&path).unwrap().entries().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}
