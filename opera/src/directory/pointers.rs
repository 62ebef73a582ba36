//! Block pointers trailing a directory entry
//!
//! An entry with `copy_count = M` is followed by `M + 1` big-endian block
//! indices: the original and its mirrors. The array is not part of the fixed
//! record, so it is read here using the count the entry just decoded.

use crate::error::{OperaError, Result};
use crate::io;
use crate::types::BLOB_POINTER_SIZE;
use byteorder::{BigEndian, ByteOrder};
use std::io::{Read, Seek};
use tracing::trace;

/// Read the `copy_count + 1` block pointers at the current position
///
/// A count above `max_pointers` fails with
/// [`OperaError::CorruptDirectory`] before any byte is consumed.
pub fn read_blob_pointers<R: Read + Seek + ?Sized>(
    reader: &mut R,
    copy_count: u32,
    max_pointers: u32,
) -> Result<Vec<u32>> {
    let count = u64::from(copy_count) + 1;
    if count > u64::from(max_pointers) {
        let offset = io::position(reader)?;
        return Err(OperaError::corrupt(
            offset,
            format!(
                "entry claims {} block pointers, at most {} allowed",
                count, max_pointers
            ),
        ));
    }

    // count <= max_pointers <= u32::MAX, so this fits
    let count = count as usize;
    let mut raw = vec![0u8; count * BLOB_POINTER_SIZE];
    let offset = io::read_exact_record(reader, "block pointers", &mut raw)?;

    let mut pointers = vec![0u32; count];
    BigEndian::read_u32_into(&raw, &mut pointers);
    trace!(offset, ?pointers, "read block pointers");
    Ok(pointers)
}
