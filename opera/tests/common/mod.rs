//! Common test utilities and mock block devices

pub mod builder;
pub use builder::{ImageBuilder, Node};

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
    pub reads: usize,
    /// Block count to report instead of the real one
    pub reported_blocks: Option<u64>,
}

impl MemoryBlockDevice {
    /// Create a new memory block device from raw data
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            block_size: 2048, // Opera block size
            reads: 0,
            reported_blocks: None,
        }
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok(self
            .reported_blocks
            .unwrap_or((self.data.len() / self.block_size) as u64))
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        self.reads += 1;
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, _start_lba: Lba, _src: &[u8]) -> Result<(), Self::Error> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "test device is read-only",
        ))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Stream wrapper that fails every read at or past `fail_at`
pub struct FailingReader {
    pub inner: Cursor<Vec<u8>>,
    pub fail_at: u64,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.inner.position() >= self.fail_at {
            return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
        }
        let room = (self.fail_at - self.inner.position()) as usize;
        let len = buf.len().min(room);
        self.inner.read(&mut buf[..len])
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Deterministic file contents
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

/// The volume used by most tests:
///
/// ```text
/// /READ_ME             13 bytes
/// /IronManData/        dir
/// /IronManData/QT/     dir
/// /IronManData/QT/intro.mov   12345 bytes
/// /IronManData/QT/outro.mov   4096 bytes
/// /IronManData/level1.dat     2050 bytes
/// /Empty.dat           0 bytes
/// ```
pub fn sample_image() -> Vec<u8> {
    ImageBuilder::new("IRONMAN")
        .add(Node::file("READ_ME", b"Hello, Opera!".to_vec()))
        .add(Node::dir(
            "IronManData",
            vec![
                Node::dir(
                    "QT",
                    vec![
                        Node::file("intro.mov", pattern(12345, 1)),
                        Node::file("outro.mov", pattern(4096, 2)),
                    ],
                ),
                Node::file("level1.dat", pattern(2050, 3)),
            ],
        ))
        .add(Node::file("Empty.dat", Vec::new()))
        .build()
}
