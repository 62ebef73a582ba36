//! Directory walking and path resolution

pub mod entry;
pub mod pointers;
pub mod walker;

pub use entry::Entry;
pub use pointers::read_blob_pointers;
pub use walker::{read_directory, read_directory_block, DirectoryBlock};

use crate::config::ReadOptions;
use crate::error::{OperaError, Result};
use crate::io;
use crate::types::MAX_DIRECTORY_DEPTH;
use crate::utils::string;
use crate::volume::{read_root, Volume};
use std::io::{Read, Seek};
use tracing::debug;

/// Find an entry by exact, case-sensitive name
///
/// The first match in on-disk order wins.
pub fn find_entry<'a>(entries: &'a [Entry], name: &str) -> Result<&'a Entry> {
    entries
        .iter()
        .find(|entry| entry.matches(name))
        .ok_or_else(|| OperaError::NotFound {
            name: name.to_string(),
        })
}

/// Read the directory an entry points to
pub fn open_subdirectory<R: Read + Seek + ?Sized>(
    reader: &mut R,
    entry: &Entry,
    block_size: u32,
    options: &ReadOptions,
) -> Result<Vec<Entry>> {
    if !entry.is_directory() {
        return Err(OperaError::NotADirectory {
            name: entry.name().into_owned(),
        });
    }

    let offset = entry.data_offset(block_size);
    debug!(name = %entry.name(), offset, "descending into directory");
    io::seek_to(reader, offset)?;
    read_directory(reader, block_size, options)
}

/// Resolve path segments from the root and return the final directory's entries
///
/// Segments resolve strictly left to right with no backtracking. No segments
/// yields the root directory.
pub fn resolve_directory<R: Read + Seek + ?Sized, S: AsRef<str>>(
    reader: &mut R,
    volume: &Volume,
    segments: &[S],
) -> Result<Vec<Entry>> {
    let mut entries = read_root(reader, volume)?;
    for segment in segments {
        let entry = find_entry(&entries, segment.as_ref())?;
        entries = open_subdirectory(reader, entry, volume.block_size(), &volume.options)?;
    }
    Ok(entries)
}

/// List a directory by slash-separated path (`""` or `"/"` is the root)
pub fn list_directory<R: Read + Seek + ?Sized>(
    reader: &mut R,
    volume: &Volume,
    path: &str,
) -> Result<Vec<Entry>> {
    resolve_directory(reader, volume, &string::split_path(path))
}

/// Find a file or directory entry by slash-separated path
///
/// The root has no entry of its own, so an empty path is `NotFound`.
pub fn find_file<R: Read + Seek + ?Sized>(
    reader: &mut R,
    volume: &Volume,
    path: &str,
) -> Result<Entry> {
    let components = string::split_path(path);
    let Some((last, parents)) = components.split_last() else {
        return Err(OperaError::NotFound {
            name: path.to_string(),
        });
    };

    let entries = resolve_directory(reader, volume, parents)?;
    find_entry(&entries, last).cloned()
}

/// Visit every entry below the root, depth first, in on-disk order
///
/// The visitor receives the entry's full path (`/A/B`), the entry and its
/// depth (0 for root entries).
pub fn walk_tree<R, F>(reader: &mut R, volume: &Volume, mut visitor: F) -> Result<()>
where
    R: Read + Seek + ?Sized,
    F: FnMut(&str, &Entry, usize),
{
    let root = read_root(reader, volume)?;
    walk_entries(reader, volume, &root, "", 0, &mut visitor)
}

/// Visit every entry below the directory at `path`, depth first
///
/// Paths handed to the visitor are absolute; depth counts from the
/// directory's own entries.
pub fn walk_path<R, F>(reader: &mut R, volume: &Volume, path: &str, mut visitor: F) -> Result<()>
where
    R: Read + Seek + ?Sized,
    F: FnMut(&str, &Entry, usize),
{
    let segments = string::split_path(path);
    let entries = resolve_directory(reader, volume, &segments)?;
    let parent: String = segments.iter().map(|s| format!("/{}", s)).collect();
    walk_entries(reader, volume, &entries, &parent, 0, &mut visitor)
}

fn walk_entries<R, F>(
    reader: &mut R,
    volume: &Volume,
    entries: &[Entry],
    parent: &str,
    depth: usize,
    visitor: &mut F,
) -> Result<()>
where
    R: Read + Seek + ?Sized,
    F: FnMut(&str, &Entry, usize),
{
    if depth >= MAX_DIRECTORY_DEPTH {
        let offset = entries.first().map(Entry::offset).unwrap_or_default();
        return Err(OperaError::corrupt(
            offset,
            format!("directory nesting deeper than {}", MAX_DIRECTORY_DEPTH),
        ));
    }

    for entry in entries {
        let path = format!("{}/{}", parent, entry.name());
        visitor(&path, entry, depth);

        if entry.is_directory() {
            let children = open_subdirectory(reader, entry, volume.block_size(), &volume.options)?;
            walk_entries(reader, volume, &children, &path, depth + 1, visitor)?;
        }
    }
    Ok(())
}
