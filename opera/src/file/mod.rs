//! File extraction
//!
//! Extraction seeks away from wherever the caller's stream is, so the cursor
//! is saved first and restored afterwards, on failure too. That makes it safe
//! to extract between steps of a directory walk sharing the same stream.

use crate::directory::Entry;
use crate::error::{OperaError, Result};
use crate::io;
use crate::volume::Volume;
use std::io::{Read, Seek, Write};
use tracing::debug;

/// Copy buffer size
const COPY_CHUNK: usize = 64 * 1024;

/// Copy a file entry's bytes verbatim to `sink`
///
/// Writes exactly `byte_length` bytes read from the canonical copy and
/// returns the count. The stream's cursor is left where it was found.
pub fn extract<R, W>(reader: &mut R, entry: &Entry, block_size: u32, sink: &mut W) -> Result<u64>
where
    R: Read + Seek + ?Sized,
    W: Write + ?Sized,
{
    if entry.is_directory() {
        return Err(OperaError::NotAFile {
            name: entry.name().into_owned(),
        });
    }

    let saved = io::position(reader)?;
    let copied = copy_data(reader, entry, block_size, sink);
    let restored = io::seek_to(reader, saved);

    let copied = copied?;
    restored?;
    Ok(copied)
}

/// Extract a file entry of `volume` to `sink`
pub fn extract_file<R, W>(reader: &mut R, volume: &Volume, entry: &Entry, sink: &mut W) -> Result<u64>
where
    R: Read + Seek + ?Sized,
    W: Write + ?Sized,
{
    extract(reader, entry, volume.block_size(), sink)
}

/// Read a file entry of `volume` into memory
pub fn read_file_vec<R: Read + Seek + ?Sized>(
    reader: &mut R,
    volume: &Volume,
    entry: &Entry,
) -> Result<Vec<u8>> {
    // The length comes from disc; grow as data actually arrives
    let capacity = entry.byte_length().min(COPY_CHUNK as u64) as usize;
    let mut buffer = Vec::with_capacity(capacity);
    extract_file(reader, volume, entry, &mut buffer)?;
    Ok(buffer)
}

fn copy_data<R, W>(reader: &mut R, entry: &Entry, block_size: u32, sink: &mut W) -> Result<u64>
where
    R: Read + Seek + ?Sized,
    W: Write + ?Sized,
{
    let offset = entry.data_offset(block_size);
    let length = entry.byte_length();
    debug!(name = %entry.name(), offset, length, "extracting file");
    io::seek_to(reader, offset)?;

    let mut chunk = vec![0u8; COPY_CHUNK.min(length as usize)];
    let mut copied = 0u64;
    while copied < length {
        let want = (length - copied).min(chunk.len() as u64) as usize;
        let got = io::read_full(reader, &mut chunk[..want])
            .map_err(|e| OperaError::io(offset + copied, e))?;
        if got < want {
            return Err(OperaError::TruncatedInput {
                record: "file data",
                offset,
                needed: length as usize,
                available: (copied as usize) + got,
            });
        }

        sink.write_all(&chunk[..got])
            .map_err(|e| OperaError::io(offset + copied, e))?;
        copied += got as u64;
    }

    Ok(copied)
}
