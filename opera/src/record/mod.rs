//! Fixed-size on-disk records
//!
//! Every Opera structure is a fixed-layout, big-endian record. Records decode
//! from a byte slice and encode back to the exact bytes they came from.

pub mod directory;
pub mod volume;

pub use directory::{DirectoryEntry, DirectoryHeader};
pub use volume::{RootDirectoryHeader, VolumeHeader};

use crate::error::{OperaError, Result};
use crate::io;
use std::io::{Read, Seek};

/// A fixed-size big-endian record
pub trait Record: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Human-readable record name used in errors
    const NAME: &'static str;

    /// Decode from the first `SIZE` bytes of `bytes`
    ///
    /// Fails with [`OperaError::TruncatedInput`] (offset relative to the
    /// slice) when fewer than `SIZE` bytes are given.
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// Encode into exactly `SIZE` bytes
    fn encode(&self) -> Vec<u8>;
}

/// Check that a slice is long enough to hold `R`
pub(crate) fn ensure_len<R: Record>(bytes: &[u8]) -> Result<()> {
    if bytes.len() < R::SIZE {
        return Err(OperaError::TruncatedInput {
            record: R::NAME,
            offset: 0,
            needed: R::SIZE,
            available: bytes.len(),
        });
    }
    Ok(())
}

/// Decode one record at the stream's current position
///
/// The cursor advances past the record on success.
pub fn read_record<T: Record, R: Read + Seek + ?Sized>(reader: &mut R) -> Result<T> {
    let mut buf = vec![0u8; T::SIZE];
    io::read_exact_record(reader, T::NAME, &mut buf)?;
    T::decode(&buf)
}
