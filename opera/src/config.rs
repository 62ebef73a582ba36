//! Reader configuration
//!
//! Bounds that keep a corrupt image from driving the walker into unbounded
//! reads. Defaults suit every pressed 3DO disc we have looked at.

/// Default bound on the block pointers trailing one entry (`M + 1`)
pub const DEFAULT_MAX_BLOB_POINTERS: u32 = 10;

/// Default bound on entries decoded from a single directory block
pub const DEFAULT_MAX_ENTRIES_PER_BLOCK: usize = 1024;

/// Default bound on blocks chained into one directory
pub const DEFAULT_MAX_DIRECTORY_BLOCKS: usize = 64;

/// Options controlling how a volume is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Upper bound for the number of pointers following an entry
    pub max_blob_pointers: u32,

    /// Entries scanned in one block before the directory is declared corrupt
    pub max_entries_per_block: usize,

    /// Blocks followed through `next` links before giving up
    pub max_directory_blocks: usize,

    /// Follow "last in block" continuations into the next directory block
    pub follow_block_chains: bool,

    /// Check the record type and sync marker of the volume header
    pub verify_signature: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_blob_pointers: DEFAULT_MAX_BLOB_POINTERS,
            max_entries_per_block: DEFAULT_MAX_ENTRIES_PER_BLOCK,
            max_directory_blocks: DEFAULT_MAX_DIRECTORY_BLOCKS,
            follow_block_chains: true,
            verify_signature: true,
        }
    }
}

impl ReadOptions {
    /// Set the bound on trailing block pointers
    pub fn max_blob_pointers(mut self, max: u32) -> Self {
        self.max_blob_pointers = max;
        self
    }

    /// Set the bound on entries per block
    pub fn max_entries_per_block(mut self, max: usize) -> Self {
        self.max_entries_per_block = max;
        self
    }

    /// Set the bound on chained directory blocks
    pub fn max_directory_blocks(mut self, max: usize) -> Self {
        self.max_directory_blocks = max;
        self
    }

    /// Enable or disable following chained directory blocks
    pub fn follow_block_chains(mut self, follow: bool) -> Self {
        self.follow_block_chains = follow;
        self
    }

    /// Enable or disable the volume signature check
    pub fn verify_signature(mut self, verify: bool) -> Self {
        self.verify_signature = verify;
        self
    }
}
