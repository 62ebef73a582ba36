//! Directory block header and directory entry
//!
//! A directory block starts with a 20-byte header, followed by entries. Each
//! entry is a 68-byte record trailed by `copy_count + 1` block pointers, which
//! are decoded separately (see `directory::pointers`).

use super::{ensure_len, Record};
use crate::error::Result;
use crate::types::{
    FixedName, TypeTag, DIRECTORY_ENTRY_SIZE, DIRECTORY_HEADER_SIZE,
    ENTRY_FLAG_LAST_IN_BLOCK, ENTRY_FLAG_LAST_IN_DIRECTORY, NAME_LENGTH,
};
use byteorder::{BigEndian, ByteOrder};

/// Header at the start of every directory block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryHeader {
    /// Next block of this directory, negative when there is none
    pub next_block: i32,
    /// Previous block of this directory, negative when there is none
    pub previous_block: i32,
    /// Directory flags
    pub flags: u32,
    /// Offset of the first unused byte in this block
    pub first_unused_byte: u32,
    /// Offset of the first entry in this block
    pub first_entry_offset: u32,
}

impl DirectoryHeader {
    /// Next block as a non-negative block offset
    pub fn next(&self) -> Option<u32> {
        u32::try_from(self.next_block).ok()
    }

    /// Previous block as a non-negative block offset
    pub fn previous(&self) -> Option<u32> {
        u32::try_from(self.previous_block).ok()
    }
}

impl Record for DirectoryHeader {
    const SIZE: usize = DIRECTORY_HEADER_SIZE;
    const NAME: &'static str = "directory header";

    fn decode(bytes: &[u8]) -> Result<Self> {
        ensure_len::<Self>(bytes)?;
        Ok(Self {
            next_block: BigEndian::read_i32(&bytes[0..4]),
            previous_block: BigEndian::read_i32(&bytes[4..8]),
            flags: BigEndian::read_u32(&bytes[8..12]),
            first_unused_byte: BigEndian::read_u32(&bytes[12..16]),
            first_entry_offset: BigEndian::read_u32(&bytes[16..20]),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        BigEndian::write_i32(&mut out[0..4], self.next_block);
        BigEndian::write_i32(&mut out[4..8], self.previous_block);
        BigEndian::write_u32(&mut out[8..12], self.flags);
        BigEndian::write_u32(&mut out[12..16], self.first_unused_byte);
        BigEndian::write_u32(&mut out[16..20], self.first_entry_offset);
        out
    }
}

/// Fixed part of a directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry flags (bit 31 last in directory, bit 30 last in block)
    pub flags: u32,
    /// Entry identifier
    pub id: u32,
    /// Type tag (`*dir` for subdirectories)
    pub entry_type: TypeTag,
    /// Block size used by the entry's data
    pub block_size: u32,
    /// Data length in bytes
    pub byte_length: u32,
    /// Data length in blocks
    pub block_length: u32,
    /// Burst transfer size
    pub burst: u32,
    /// Gap between bursts
    pub gap: u32,
    /// NUL-padded filename
    pub name: FixedName<NAME_LENGTH>,
    /// Number of mirrored copies; `copy_count + 1` pointers follow
    pub copy_count: u32,
}

impl DirectoryEntry {
    /// Last entry of the directory
    pub fn is_last_in_directory(&self) -> bool {
        self.flags & ENTRY_FLAG_LAST_IN_DIRECTORY != 0
    }

    /// Last entry of this block
    pub fn is_last_in_block(&self) -> bool {
        self.flags & ENTRY_FLAG_LAST_IN_BLOCK != 0
    }

    /// Is this entry a subdirectory?
    pub fn is_directory(&self) -> bool {
        self.entry_type.is_directory()
    }

    /// Number of trailing block pointers (`copy_count + 1`)
    pub fn pointer_count(&self) -> u64 {
        u64::from(self.copy_count) + 1
    }
}

impl Record for DirectoryEntry {
    const SIZE: usize = DIRECTORY_ENTRY_SIZE;
    const NAME: &'static str = "directory entry";

    fn decode(bytes: &[u8]) -> Result<Self> {
        ensure_len::<Self>(bytes)?;

        let mut entry_type = [0u8; 4];
        entry_type.copy_from_slice(&bytes[8..12]);
        let mut name = [0u8; NAME_LENGTH];
        name.copy_from_slice(&bytes[32..64]);

        Ok(Self {
            flags: BigEndian::read_u32(&bytes[0..4]),
            id: BigEndian::read_u32(&bytes[4..8]),
            entry_type: TypeTag(entry_type),
            block_size: BigEndian::read_u32(&bytes[12..16]),
            byte_length: BigEndian::read_u32(&bytes[16..20]),
            block_length: BigEndian::read_u32(&bytes[20..24]),
            burst: BigEndian::read_u32(&bytes[24..28]),
            gap: BigEndian::read_u32(&bytes[28..32]),
            name: FixedName::new(name),
            copy_count: BigEndian::read_u32(&bytes[64..68]),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        BigEndian::write_u32(&mut out[0..4], self.flags);
        BigEndian::write_u32(&mut out[4..8], self.id);
        out[8..12].copy_from_slice(&self.entry_type.0);
        BigEndian::write_u32(&mut out[12..16], self.block_size);
        BigEndian::write_u32(&mut out[16..20], self.byte_length);
        BigEndian::write_u32(&mut out[20..24], self.block_length);
        BigEndian::write_u32(&mut out[24..28], self.burst);
        BigEndian::write_u32(&mut out[28..32], self.gap);
        out[32..64].copy_from_slice(self.name.as_bytes());
        BigEndian::write_u32(&mut out[64..68], self.copy_count);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_absent_links() {
        let header = DirectoryHeader {
            next_block: -1,
            previous_block: -1,
            flags: 0,
            first_unused_byte: 0x800,
            first_entry_offset: 20,
        };
        assert_eq!(header.next(), None);
        assert_eq!(header.previous(), None);

        let bytes = header.encode();
        assert_eq!(&bytes[0..8], &[0xFF; 8]);
        assert_eq!(DirectoryHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn test_entry_flags() {
        let mut entry = DirectoryEntry {
            flags: 0xC000_0000,
            id: 7,
            entry_type: TypeTag::DIRECTORY,
            block_size: 2048,
            byte_length: 2048,
            block_length: 1,
            burst: 1,
            gap: 0,
            name: FixedName::padded("QT"),
            copy_count: 2,
        };
        assert!(entry.is_last_in_directory());
        assert!(entry.is_last_in_block());
        assert!(entry.is_directory());
        assert_eq!(entry.pointer_count(), 3);

        entry.flags = 0x4000_0000;
        assert!(!entry.is_last_in_directory());
        assert!(entry.is_last_in_block());
    }

    #[test]
    fn test_entry_pointer_count_cannot_overflow() {
        let mut bytes = vec![0u8; DIRECTORY_ENTRY_SIZE];
        bytes[64..68].copy_from_slice(&[0xFF; 4]);
        let entry = DirectoryEntry::decode(&bytes).unwrap();
        assert_eq!(entry.pointer_count(), u64::from(u32::MAX) + 1);
    }
}
