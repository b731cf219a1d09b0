//! WAL Reader
//!
//! Handles reading entries from the WAL file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{KvError, Result};
use super::{WalEntry, HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Reads entries from the WAL file
pub struct WalReader {
    /// Buffered file handle
    reader: BufReader<File>,

    /// Offset just past the last entry read successfully
    position: u64,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
        })
    }

    /// Read the next entry from the WAL
    ///
    /// Returns:
    /// - `Ok(Some(entry))` — a complete, checksummed entry
    /// - `Ok(None)` — clean end of file
    /// - `Err(KvError::WalCorruption)` — torn or damaged entry at `position()`
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        let mut header = [0u8; HEADER_SIZE];
        let got = self.read_full(&mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < HEADER_SIZE {
            return Err(KvError::WalCorruption(format!(
                "torn header at offset {}: {} of {} bytes",
                self.position, got, HEADER_SIZE
            )));
        }

        let mut lsn_bytes = [0u8; 8];
        lsn_bytes.copy_from_slice(&header[0..8]);
        let lsn = u64::from_le_bytes(lsn_bytes);
        let crc = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        let len = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);

        if len > MAX_PAYLOAD_SIZE {
            return Err(KvError::WalCorruption(format!(
                "implausible payload length {} at offset {}",
                len, self.position
            )));
        }

        let mut payload = vec![0u8; len as usize];
        let got = self.read_full(&mut payload)?;
        if got < payload.len() {
            return Err(KvError::WalCorruption(format!(
                "torn payload at offset {}: {} of {} bytes",
                self.position, got, len
            )));
        }

        let entry = WalEntry::deserialize(lsn, crc, &payload)?;
        self.position += (HEADER_SIZE + payload.len()) as u64;
        Ok(Some(entry))
    }

    /// Iterate over all valid entries
    pub fn entries(self) -> WalIterator {
        WalIterator {
            reader: self,
            done: false,
        }
    }

    /// Offset just past the last complete entry
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Fill `buf` unless EOF comes first; returns the bytes read
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

/// Iterator over WAL entries
///
/// Yields entries until end of file; yields one error and then stops
/// if the log is damaged.
pub struct WalIterator {
    reader: WalReader,
    done: bool,
}

impl Iterator for WalIterator {
    type Item = Result<WalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
