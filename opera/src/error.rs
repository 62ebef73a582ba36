//! Error types for Opera filesystem operations

use std::io;
use thiserror::Error;

/// Result type for Opera filesystem operations
pub type Result<T> = core::result::Result<T, OperaError>;

/// Errors that can occur while reading an Opera volume
#[derive(Debug, Error)]
pub enum OperaError {
    /// Fewer bytes were available than a fixed record requires
    #[error("truncated {record}: need {needed} bytes at offset {offset:#x}, got {available}")]
    TruncatedInput {
        /// Record being decoded
        record: &'static str,
        /// Byte offset the record starts at
        offset: u64,
        /// Bytes the record requires
        needed: usize,
        /// Bytes that were actually available
        available: usize,
    },

    /// Directory structure is implausible (bad redundancy count, no terminator)
    #[error("corrupt directory at offset {offset:#x}: {reason}")]
    CorruptDirectory {
        /// Byte offset of the offending record
        offset: u64,
        /// What was wrong with it
        reason: String,
    },

    /// Path segment does not exist in the directory being searched
    #[error("'{name}' not found")]
    NotFound {
        /// Segment that failed to resolve
        name: String,
    },

    /// Path segment names a file where a directory was expected
    #[error("'{name}' is not a directory")]
    NotADirectory {
        /// Entry name
        name: String,
    },

    /// Extraction was asked for a directory entry
    #[error("'{name}' is not a file")]
    NotAFile {
        /// Entry name
        name: String,
    },

    /// Volume header failed the signature or sanity checks
    #[error("invalid volume header: {reason}")]
    InvalidVolume {
        /// Which check failed
        reason: &'static str,
    },

    /// Seek, read or write on the underlying stream failed
    #[error("I/O error at offset {offset:#x}: {source}")]
    Io {
        /// Stream offset the operation was attempted at
        offset: u64,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl OperaError {
    /// Build an I/O error tagged with the offset it happened at
    pub fn io(offset: u64, source: io::Error) -> Self {
        Self::Io { offset, source }
    }

    /// Build a corrupt-directory error
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Self::CorruptDirectory {
            offset,
            reason: reason.into(),
        }
    }

    /// True for errors a caller can recover from by trying another path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
