//! Decoded directory entries

use crate::record::DirectoryEntry;
use crate::types::block_to_byte;
use std::borrow::Cow;

/// A directory entry paired with its block pointers
///
/// Always carries at least one pointer: the canonical copy in slot 0,
/// followed by the mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    record: DirectoryEntry,
    blob_pointers: Vec<u32>,
    offset: u64,
}

impl Entry {
    pub(crate) fn new(record: DirectoryEntry, blob_pointers: Vec<u32>, offset: u64) -> Self {
        debug_assert!(!blob_pointers.is_empty());
        Self {
            record,
            blob_pointers,
            offset,
        }
    }

    /// Fixed entry record
    pub fn record(&self) -> &DirectoryEntry {
        &self.record
    }

    /// All block pointers, canonical copy first
    pub fn blob_pointers(&self) -> &[u32] {
        &self.blob_pointers
    }

    /// Mirrored copies only
    pub fn mirrors(&self) -> &[u32] {
        &self.blob_pointers[1..]
    }

    /// Byte offset of the entry record in the volume
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Cleaned filename
    pub fn name(&self) -> Cow<'_, str> {
        self.record.name.to_string_lossy()
    }

    /// Exact, case-sensitive filename comparison
    pub fn matches(&self, name: &str) -> bool {
        self.record.name.matches(name)
    }

    /// Is this a subdirectory?
    pub fn is_directory(&self) -> bool {
        self.record.is_directory()
    }

    /// Is this a regular file?
    pub fn is_file(&self) -> bool {
        !self.is_directory()
    }

    /// Data length in bytes
    pub fn byte_length(&self) -> u64 {
        u64::from(self.record.byte_length)
    }

    /// Block holding the canonical copy of the data
    pub fn canonical_block(&self) -> u32 {
        self.blob_pointers[0]
    }

    /// Byte offset of the canonical copy
    pub fn data_offset(&self, block_size: u32) -> u64 {
        block_to_byte(self.canonical_block(), block_size)
    }
}
