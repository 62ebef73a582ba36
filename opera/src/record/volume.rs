//! Volume header and root directory header
//!
//! Both live at the start of block 0:
//!
//! ```text
//! 0x00  u8        record type (1)
//! 0x01  [u8; 5]   sync marker "ZZZZZ"
//! 0x06  u8        record version
//! 0x07  u8        volume flags
//! 0x08  [u8; 32]  comment
//! 0x28  [u8; 32]  label
//! 0x48  u32       volume identifier
//! 0x4C  u32       block size
//! 0x50  u32       block count
//! 0x54  u32       root directory identifier
//! 0x58  u32       root block count
//! 0x5C  u32       root block size
//! 0x60  u32       root copy count
//! 0x64  [u32; 8]  root copy block addresses
//! ```

use super::{ensure_len, Record};
use crate::error::Result;
use crate::types::{
    block_to_byte, FixedName, NAME_LENGTH, ROOT_COPY_SLOTS, ROOT_DIRECTORY_HEADER_SIZE,
    VOLUME_HEADER_SIZE, VOLUME_RECORD_TYPE, VOLUME_SYNC_BYTES,
};
use byteorder::{BigEndian, ByteOrder};

/// Volume header (byte offset 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeHeader {
    /// Record type (1 for a volume header)
    pub record_type: u8,
    /// Synchronization marker
    pub sync_bytes: [u8; 5],
    /// Record version
    pub record_version: u8,
    /// Volume flags
    pub volume_flags: u8,
    /// Volume comment
    pub comment: FixedName<NAME_LENGTH>,
    /// Volume label
    pub label: FixedName<NAME_LENGTH>,
    /// Volume identifier
    pub volume_id: u32,
    /// Size of one block in bytes
    pub block_size: u32,
    /// Number of blocks on the volume
    pub block_count: u32,
}

impl VolumeHeader {
    /// Record type and sync marker match an Opera volume
    pub fn has_valid_signature(&self) -> bool {
        self.record_type == VOLUME_RECORD_TYPE && self.sync_bytes == VOLUME_SYNC_BYTES
    }

    /// Total volume size in bytes
    pub fn volume_size(&self) -> u64 {
        block_to_byte(self.block_count, self.block_size)
    }
}

impl Record for VolumeHeader {
    const SIZE: usize = VOLUME_HEADER_SIZE;
    const NAME: &'static str = "volume header";

    fn decode(bytes: &[u8]) -> Result<Self> {
        ensure_len::<Self>(bytes)?;

        let mut sync_bytes = [0u8; 5];
        sync_bytes.copy_from_slice(&bytes[1..6]);
        let mut comment = [0u8; NAME_LENGTH];
        comment.copy_from_slice(&bytes[8..40]);
        let mut label = [0u8; NAME_LENGTH];
        label.copy_from_slice(&bytes[40..72]);

        Ok(Self {
            record_type: bytes[0],
            sync_bytes,
            record_version: bytes[6],
            volume_flags: bytes[7],
            comment: FixedName::new(comment),
            label: FixedName::new(label),
            volume_id: BigEndian::read_u32(&bytes[72..76]),
            block_size: BigEndian::read_u32(&bytes[76..80]),
            block_count: BigEndian::read_u32(&bytes[80..84]),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        out[0] = self.record_type;
        out[1..6].copy_from_slice(&self.sync_bytes);
        out[6] = self.record_version;
        out[7] = self.volume_flags;
        out[8..40].copy_from_slice(self.comment.as_bytes());
        out[40..72].copy_from_slice(self.label.as_bytes());
        BigEndian::write_u32(&mut out[72..76], self.volume_id);
        BigEndian::write_u32(&mut out[76..80], self.block_size);
        BigEndian::write_u32(&mut out[80..84], self.block_count);
        out
    }
}

/// Root directory header (immediately after the volume header)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDirectoryHeader {
    /// Directory identifier
    pub directory_id: u32,
    /// Number of blocks in the root directory
    pub block_count: u32,
    /// Block size of the root directory
    pub block_size: u32,
    /// How many of the copy slots are populated
    pub copy_count: u32,
    /// Block addresses of the root directory copies; slot 0 is canonical
    pub copies: [u32; ROOT_COPY_SLOTS],
}

impl RootDirectoryHeader {
    /// Block address of the canonical root directory
    pub fn canonical_block(&self) -> u32 {
        self.copies[0]
    }

    /// Populated copy slots (clamped to the slot array)
    pub fn populated_copies(&self) -> &[u32] {
        let count = (self.copy_count as usize).min(ROOT_COPY_SLOTS);
        &self.copies[..count]
    }
}

impl Record for RootDirectoryHeader {
    const SIZE: usize = ROOT_DIRECTORY_HEADER_SIZE;
    const NAME: &'static str = "root directory header";

    fn decode(bytes: &[u8]) -> Result<Self> {
        ensure_len::<Self>(bytes)?;

        let mut copies = [0u32; ROOT_COPY_SLOTS];
        BigEndian::read_u32_into(&bytes[16..48], &mut copies);

        Ok(Self {
            directory_id: BigEndian::read_u32(&bytes[0..4]),
            block_count: BigEndian::read_u32(&bytes[4..8]),
            block_size: BigEndian::read_u32(&bytes[8..12]),
            copy_count: BigEndian::read_u32(&bytes[12..16]),
            copies,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        BigEndian::write_u32(&mut out[0..4], self.directory_id);
        BigEndian::write_u32(&mut out[4..8], self.block_count);
        BigEndian::write_u32(&mut out[8..12], self.block_size);
        BigEndian::write_u32(&mut out[12..16], self.copy_count);
        BigEndian::write_u32_into(&self.copies, &mut out[16..48]);
        out
    }
}
