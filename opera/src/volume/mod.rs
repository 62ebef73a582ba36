//! Volume opening
//!
//! Block 0 starts with the volume header, followed directly by the root
//! directory header. The root directory itself lives at the block named by
//! the first of its redundant copies.

use crate::config::ReadOptions;
use crate::directory::{read_directory, Entry};
use crate::error::{OperaError, Result};
use crate::io;
use crate::record::{read_record, Record, RootDirectoryHeader, VolumeHeader};
use crate::types::{block_to_byte, ROOT_COPY_SLOTS, VOLUME_RECORD_TYPE, VOLUME_SYNC_BYTES};
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// An opened Opera volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Decoded volume header
    pub header: VolumeHeader,
    /// Decoded root directory header
    pub root: RootDirectoryHeader,
    /// Options every walk of this volume uses
    pub options: ReadOptions,
}

impl Volume {
    /// Volume block size in bytes
    pub fn block_size(&self) -> u32 {
        self.header.block_size
    }

    /// Byte offset of the canonical root directory
    pub fn root_directory_offset(&self) -> u64 {
        block_to_byte(self.root.canonical_block(), self.header.block_size)
    }

    /// Block addresses of every populated root directory copy
    pub fn root_copies(&self) -> &[u32] {
        self.root.populated_copies()
    }
}

/// Open a volume with default options
pub fn open_volume<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Volume> {
    open_volume_with(reader, ReadOptions::default())
}

/// Open a volume: decode the volume header at offset 0 and the root
/// directory header that follows it
pub fn open_volume_with<R: Read + Seek + ?Sized>(
    reader: &mut R,
    options: ReadOptions,
) -> Result<Volume> {
    io::seek_to(reader, 0)?;
    let header: VolumeHeader = read_record(reader)?;

    if options.verify_signature {
        if header.record_type != VOLUME_RECORD_TYPE {
            return Err(OperaError::InvalidVolume {
                reason: "record type is not 1",
            });
        }
        if header.sync_bytes != VOLUME_SYNC_BYTES {
            return Err(OperaError::InvalidVolume {
                reason: "sync marker is not ZZZZZ",
            });
        }
    }
    if header.block_size == 0 {
        return Err(OperaError::InvalidVolume {
            reason: "block size is zero",
        });
    }

    let root: RootDirectoryHeader = read_record(reader)?;
    if root.copy_count as usize > ROOT_COPY_SLOTS {
        return Err(OperaError::corrupt(
            VolumeHeader::SIZE as u64,
            format!(
                "root directory claims {} copies, header holds {}",
                root.copy_count, ROOT_COPY_SLOTS
            ),
        ));
    }
    if root.copy_count == 0 {
        warn!("root directory header lists no copies, using slot 0");
    }

    let volume = Volume {
        header,
        root,
        options,
    };
    debug!(
        label = %volume.header.label,
        block_size = volume.header.block_size,
        block_count = volume.header.block_count,
        root_offset = volume.root_directory_offset(),
        "opened volume"
    );
    Ok(volume)
}

/// Read the root directory's entries
pub fn read_root<R: Read + Seek + ?Sized>(reader: &mut R, volume: &Volume) -> Result<Vec<Entry>> {
    io::seek_to(reader, volume.root_directory_offset())?;
    read_directory(reader, volume.block_size(), &volume.options)
}
