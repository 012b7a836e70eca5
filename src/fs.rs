//! Filesystem capability used by the loader.
//!
//! The loader only ever asks two questions: what kind of entry lives at a
//! path, and what names a directory contains. Both go through the
//! [`FileSystem`] trait so traversal can be driven by something other than
//! the real disk.

use std::io;
use std::path::Path;
use tracing::warn;

/// Kind of filesystem entry, as seen by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory whose children may be enqueued
    Directory,
    /// Anything else, tested against the filter
    File,
}

/// Synchronous filesystem queries the loader depends on
pub trait FileSystem {
    /// Report the kind of entry at `path`, following symlinks
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the path is missing or unreadable
    fn stat(&self, path: &Path) -> io::Result<EntryKind>;

    /// List the entry names of the directory at `path`, in listing order
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        (**self).stat(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        (**self).list_dir(path)
    }
}

/// The real filesystem, via `std::fs`
///
/// Listings are sorted by name so repeated loads of the same tree visit
/// entries in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = std::fs::metadata(path)?;

        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    warn!(dir = %path.display(), name = ?raw, "Skipping entry with non-UTF-8 name");
                }
            }
        }

        names.sort_unstable();
        Ok(names)
    }
}
