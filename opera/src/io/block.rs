//! Block device source
//!
//! Adapts any `gpt_disk_io::BlockIo` device (the same trait the bootloader's
//! disk drivers implement) to `Read + Seek`, so a disc sitting on raw media can
//! be opened with the same calls as an image file.

use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;
use std::io::{self, Read, Seek, SeekFrom};

/// `Read + Seek` view over a block device
///
/// Keeps one device block cached; sequential record reads inside a block hit
/// the device once.
pub struct BlockDeviceReader<B: BlockIo> {
    device: B,
    block_size: u64,
    len: u64,
    position: u64,
    block: Vec<u8>,
    cached_lba: Option<u64>,
}

impl<B: BlockIo> BlockDeviceReader<B> {
    /// Wrap a block device, querying its size once
    pub fn new(mut device: B) -> io::Result<Self> {
        let block_size = u64::from(device.block_size().to_u32());
        let num_blocks = device
            .num_blocks()
            .map_err(|e| io::Error::other(format!("querying block count: {:?}", e)))?;
        let len = num_blocks.checked_mul(block_size).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("device size overflows: {} blocks of {} bytes", num_blocks, block_size),
            )
        })?;
        let block_len = usize::try_from(block_size)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "block size too large"))?;

        Ok(Self {
            device,
            block_size,
            len,
            position: 0,
            block: vec![0u8; block_len],
            cached_lba: None,
        })
    }

    /// Total size of the device in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Is the device empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the underlying device
    pub fn get_mut(&mut self) -> &mut B {
        &mut self.device
    }

    /// Give back the underlying device
    pub fn into_inner(self) -> B {
        self.device
    }

    fn load(&mut self, lba: u64) -> io::Result<()> {
        if self.cached_lba == Some(lba) {
            return Ok(());
        }
        self.cached_lba = None;
        self.device
            .read_blocks(Lba(lba), &mut self.block)
            .map_err(|e| io::Error::other(format!("reading lba {}: {:?}", lba, e)))?;
        self.cached_lba = Some(lba);
        Ok(())
    }
}

impl<B: BlockIo> Read for BlockDeviceReader<B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.position >= self.len {
            return Ok(0);
        }

        let lba = self.position / self.block_size;
        let offset_in_block = (self.position % self.block_size) as usize;
        self.load(lba)?;

        let remaining_in_block = self.block.len() - offset_in_block;
        let remaining_in_device = (self.len - self.position).min(usize::MAX as u64) as usize;
        let n = buf.len().min(remaining_in_block).min(remaining_in_device);

        buf[..n].copy_from_slice(&self.block[offset_in_block..offset_in_block + n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl<B: BlockIo> Seek for BlockDeviceReader<B> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };

        match target {
            Some(offset) => {
                self.position = offset;
                Ok(offset)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of device",
            )),
        }
    }
}
