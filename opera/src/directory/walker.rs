//! Directory block walker
//!
//! Reads a directory header followed by entries until an entry carries the
//! "last in directory" flag. An entry carrying only "last in block" means the
//! directory continues in another block: each block has its own header, and
//! `next_block` counts blocks from the directory's first block.

use super::entry::Entry;
use super::pointers::read_blob_pointers;
use crate::config::ReadOptions;
use crate::error::{OperaError, Result};
use crate::io;
use crate::record::{read_record, DirectoryEntry, DirectoryHeader, Record};
use crate::types::{block_to_byte, BLOB_POINTER_SIZE};
use std::io::{Read, Seek};
use tracing::{debug, trace, warn};

/// Entries decoded from one directory block
#[derive(Debug, Clone)]
pub struct DirectoryBlock {
    /// Byte offset the block starts at
    pub offset: u64,
    /// Block header
    pub header: DirectoryHeader,
    /// Entries in on-disk order
    pub entries: Vec<Entry>,
    /// The last entry flagged a continuation in another block
    pub continues: bool,
}

/// Decode one directory block starting at the current position
///
/// Always decodes at least one entry before looking at the termination
/// flags. Stops after an entry flagged "last in directory" or "last in block".
/// Entries must lie within the used part of the block (`first_unused_byte`,
/// or the whole block when that field is zero or out of range).
pub fn read_directory_block<R: Read + Seek + ?Sized>(
    reader: &mut R,
    block_size: u32,
    options: &ReadOptions,
) -> Result<DirectoryBlock> {
    let offset = io::position(reader)?;
    let header: DirectoryHeader = read_record(reader)?;
    trace!(offset, ?header, "directory header");

    let used = match header.first_unused_byte {
        0 => block_size,
        used if used > block_size => block_size,
        used => used,
    };
    let end = offset + u64::from(used);

    let entry_start = header.first_entry_offset as usize;
    if entry_start != 0 && entry_start < DirectoryHeader::SIZE {
        warn!(
            offset,
            first_entry_offset = header.first_entry_offset,
            "first entry offset points into the header, reading after it"
        );
    }

    // Entries normally follow the header directly
    if entry_start > DirectoryHeader::SIZE {
        io::seek_to(reader, offset + u64::from(header.first_entry_offset))?;
    }

    let mut entries = Vec::new();
    let continues = loop {
        let entry_offset = io::position(reader)?;
        if entry_offset + DirectoryEntry::SIZE as u64 > end {
            return Err(past_used_bytes(entry_offset));
        }
        let record: DirectoryEntry = read_record(reader)?;
        let span = DirectoryEntry::SIZE as u64 + record.pointer_count() * BLOB_POINTER_SIZE as u64;
        if entry_offset.saturating_add(span) > end {
            return Err(past_used_bytes(entry_offset));
        }
        let pointers = read_blob_pointers(reader, record.copy_count, options.max_blob_pointers)?;
        trace!(
            offset = entry_offset,
            name = %record.name,
            entry_type = %record.entry_type,
            flags = record.flags,
            "directory entry"
        );

        let last_in_directory = record.is_last_in_directory();
        let last_in_block = record.is_last_in_block();
        entries.push(Entry::new(record, pointers, entry_offset));

        if last_in_directory {
            break false;
        }
        if last_in_block {
            break true;
        }
        if entries.len() >= options.max_entries_per_block {
            return Err(OperaError::corrupt(
                offset,
                format!(
                    "no terminating entry within {} entries",
                    options.max_entries_per_block
                ),
            ));
        }
    };

    Ok(DirectoryBlock {
        offset,
        header,
        entries,
        continues,
    })
}

fn past_used_bytes(entry_offset: u64) -> OperaError {
    OperaError::corrupt(entry_offset, "entry runs past the used part of the block")
}

/// Decode a whole directory starting at the current position
///
/// Chained blocks are followed up to `options.max_directory_blocks`; with
/// `follow_block_chains` off only the first block's entries are returned.
pub fn read_directory<R: Read + Seek + ?Sized>(
    reader: &mut R,
    block_size: u32,
    options: &ReadOptions,
) -> Result<Vec<Entry>> {
    let start = io::position(reader)?;
    let mut entries = Vec::new();
    let mut blocks = 0usize;

    loop {
        let block = read_directory_block(reader, block_size, options)?;
        blocks += 1;
        entries.extend(block.entries);

        if !block.continues {
            break;
        }
        if !options.follow_block_chains {
            debug!(offset = block.offset, "directory continues, chain following disabled");
            break;
        }

        let next = block.header.next().ok_or_else(|| {
            OperaError::corrupt(block.offset, "continuation flagged but block has no successor")
        })?;
        if blocks >= options.max_directory_blocks {
            return Err(OperaError::corrupt(
                start,
                format!(
                    "directory spans more than {} blocks",
                    options.max_directory_blocks
                ),
            ));
        }
        io::seek_to(reader, start + block_to_byte(next, block_size))?;
    }

    debug!(offset = start, blocks, entries = entries.len(), "read directory");
    Ok(entries)
}
