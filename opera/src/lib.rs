//! 3DO Opera Filesystem Reader
//!
//! Reads the filesystem found on 3DO Interactive Multiplayer discs.
//!
//! # Overview
//!
//! An Opera volume is made of fixed-size blocks (usually 2048 bytes). This crate provides:
//! - Volume header and root directory header decoding
//! - Directory walking, including directories chained over several blocks
//! - Path resolution against the directory tree
//! - File extraction from the canonical copy of each entry
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Record layer** - Fixed-size big-endian records and their trailing block pointers
//! 2. **Volume layer** - Volume header at byte 0 and the redundant root directory copies
//! 3. **Directory layer** - Directory blocks, entries and path resolution
//! 4. **File layer** - Copies file data to any `Write` sink
//!
//! Every operation takes the source stream (`Read + Seek`) explicitly; the
//! crate holds no stream of its own.
//!
//! # Usage
//!
//! ```ignore
//! use operafs::{open_volume, find_file, extract_file};
//!
//! let mut image = std::fs::File::open("ironman.iso")?;
//! let volume = open_volume(&mut image)?;
//!
//! // Find a file by path
//! let file = find_file(&mut image, &volume, "/IronManData/QT/intro.mov")?;
//!
//! // Copy it out
//! let mut out = std::fs::File::create("intro.mov")?;
//! extract_file(&mut image, &volume, &file, &mut out)?;
//! ```
//!
//! # Block devices
//!
//! ```ignore
//! use operafs::{open_volume, BlockDeviceReader};
//!
//! let mut reader = BlockDeviceReader::new(block_io)?;
//! let volume = open_volume(&mut reader)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod directory;
pub mod error;
pub mod file;
pub mod io;
pub mod record;
pub mod types;
pub mod utils;
pub mod volume;

pub use config::ReadOptions;
pub use error::{OperaError, Result};
pub use types::{FixedName, TypeTag};

// High-level API exports
pub use directory::{
    find_entry, find_file, list_directory, open_subdirectory, read_directory, resolve_directory,
    walk_path, walk_tree, Entry,
};
pub use file::{extract, extract_file, read_file_vec};
pub use io::BlockDeviceReader;
pub use record::{DirectoryEntry, DirectoryHeader, Record, RootDirectoryHeader, VolumeHeader};
pub use volume::{open_volume, open_volume_with, read_root, Volume};
