//! Stream helpers
//!
//! Every stream operation maps its failure to [`OperaError::Io`] tagged with
//! the offset it was attempted at.

pub mod block;

pub use block::BlockDeviceReader;

use crate::error::{OperaError, Result};
use std::io::{self, Read, Seek, SeekFrom};

/// Current cursor position of the stream
pub fn position<R: Seek + ?Sized>(reader: &mut R) -> Result<u64> {
    reader.stream_position().map_err(|e| OperaError::io(0, e))
}

/// Move the cursor to an absolute byte offset
pub fn seek_to<R: Seek + ?Sized>(reader: &mut R, offset: u64) -> Result<()> {
    reader
        .seek(SeekFrom::Start(offset))
        .map(|_| ())
        .map_err(|e| OperaError::io(offset, e))
}

/// Read until `buf` is full or the stream ends
///
/// Returns the number of bytes read, which is short only at end of stream.
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read exactly `buf.len()` bytes for `record` at the current position
///
/// A short read becomes [`OperaError::TruncatedInput`].
pub fn read_exact_record<R: Read + Seek + ?Sized>(
    reader: &mut R,
    record: &'static str,
    buf: &mut [u8],
) -> Result<u64> {
    let offset = position(reader)?;
    let available = read_full(reader, buf).map_err(|e| OperaError::io(offset, e))?;
    if available < buf.len() {
        return Err(OperaError::TruncatedInput {
            record,
            offset,
            needed: buf.len(),
            available,
        });
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_exact_record_short() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        cursor.set_position(1);
        let mut buf = [0u8; 4];
        match read_exact_record(&mut cursor, "sample record", &mut buf) {
            Err(OperaError::TruncatedInput {
                record,
                offset,
                needed,
                available,
            }) => {
                assert_eq!(record, "sample record");
                assert_eq!(offset, 1);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_read_exact_record_returns_start_offset() {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        cursor.set_position(8);
        let mut buf = [0u8; 8];
        assert_eq!(read_exact_record(&mut cursor, "sample record", &mut buf).unwrap(), 8);
        assert_eq!(cursor.position(), 16);
    }
}
