//! Common types and constants for the Opera filesystem

use crate::utils::string;
use core::fmt;
use std::borrow::Cow;

/// Record type of the volume header (always 1)
pub const VOLUME_RECORD_TYPE: u8 = 1;

/// Synchronization marker following the record type
pub const VOLUME_SYNC_BYTES: [u8; 5] = *b"ZZZZZ";

/// Size of the volume header record
pub const VOLUME_HEADER_SIZE: usize = 84;

/// Size of the root directory header record (follows the volume header)
pub const ROOT_DIRECTORY_HEADER_SIZE: usize = 48;

/// Number of root directory copy slots in the root directory header
pub const ROOT_COPY_SLOTS: usize = 8;

/// Size of the header at the start of every directory block
pub const DIRECTORY_HEADER_SIZE: usize = 20;

/// Size of a directory entry, excluding its trailing block pointers
pub const DIRECTORY_ENTRY_SIZE: usize = 68;

/// Size of one trailing block pointer
pub const BLOB_POINTER_SIZE: usize = 4;

/// Width of the comment, label and filename fields
pub const NAME_LENGTH: usize = 32;

/// Entry flag: last entry of the whole directory
pub const ENTRY_FLAG_LAST_IN_DIRECTORY: u32 = 0x8000_0000;

/// Entry flag: last entry of this block, the directory continues in the next block
pub const ENTRY_FLAG_LAST_IN_BLOCK: u32 = 0x4000_0000;

/// Maximum directory nesting visited by a tree walk
pub const MAX_DIRECTORY_DEPTH: usize = 32;

/// Fixed-width, NUL-padded character field
///
/// The on-disk width is kept so records re-encode byte for byte; use
/// [`FixedName::trimmed`] for comparison and display.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedName<const N: usize>(pub [u8; N]);

impl<const N: usize> FixedName<N> {
    /// Wrap raw field bytes
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Build a field from a string, NUL-padding (or truncating) to `N` bytes
    pub fn padded(name: &str) -> Self {
        let mut bytes = [0u8; N];
        let len = name.len().min(N);
        bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self(bytes)
    }

    /// Raw field bytes, padding included
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Field with trailing NULs removed
    pub fn trimmed(&self) -> &[u8] {
        string::trim_trailing_nuls(&self.0)
    }

    /// Trimmed field as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.trimmed())
    }

    /// Exact, case-sensitive comparison against a path segment
    pub fn matches(&self, name: &str) -> bool {
        self.trimmed() == name.as_bytes()
    }
}

impl<const N: usize> Default for FixedName<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Debug for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl<const N: usize> fmt::Display for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Four-byte entry type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeTag(pub [u8; 4]);

impl TypeTag {
    /// Tag carried by subdirectory entries
    pub const DIRECTORY: TypeTag = TypeTag(*b"*dir");

    /// Does this tag mark a subdirectory?
    pub fn is_directory(&self) -> bool {
        *self == Self::DIRECTORY
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Convert a block index to a byte offset
pub fn block_to_byte(block: u32, block_size: u32) -> u64 {
    u64::from(block) * u64::from(block_size)
}
