//! Filesystem primitives consumed by the walker.
//!
//! The walker never touches [`std::fs`] directly. Metadata probes, directory
//! listing, and symlink resolution go through the [`FileSystem`] trait so the
//! traversal can run against alternative backends or test doubles.
//! [`StdFileSystem`] is the default implementation.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of filesystem entry reported by a non-dereferencing probe.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntryType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed by the probe).
    Symlink,
    /// Anything else: sockets, FIFOs, devices.
    Other,
}

/// Metadata captured for an entry.
pub trait EntryMetadata {
    /// Returns the kind of entry.
    fn entry_type(&self) -> EntryType;

    /// Reports whether the entry is a directory.
    fn is_directory(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    /// Reports whether the entry is a symbolic link.
    fn is_symlink(&self) -> bool {
        self.entry_type() == EntryType::Symlink
    }
}

impl EntryMetadata for fs::Metadata {
    fn entry_type(&self) -> EntryType {
        let file_type = self.file_type();
        if file_type.is_symlink() {
            EntryType::Symlink
        } else if file_type.is_dir() {
            EntryType::Directory
        } else if file_type.is_file() {
            EntryType::File
        } else {
            EntryType::Other
        }
    }
}

/// An open directory.
///
/// Handles are released through [`DirectoryHandle::close`] so that release
/// failures can be reported instead of dropped.
pub trait DirectoryHandle {
    /// Reads every entry name in the directory, excluding `.` and `..`.
    fn read_names(&mut self) -> io::Result<Vec<OsString>>;

    /// Releases the handle.
    fn close(self) -> io::Result<()>;
}

/// Filesystem operations used during traversal.
pub trait FileSystem {
    /// Metadata type produced by [`FileSystem::symlink_metadata`].
    type Metadata: EntryMetadata;
    /// Directory handle type produced by [`FileSystem::open_dir`].
    type Directory: DirectoryHandle;

    /// Queries metadata without following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<Self::Metadata>;

    /// Resolves every symlink in `path` and returns the real path.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Opens a directory for listing.
    fn open_dir(&self, path: &Path) -> io::Result<Self::Directory>;
}

/// [`FileSystem`] backed by [`std::fs`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    type Metadata = fs::Metadata;
    type Directory = StdDirectory;

    fn symlink_metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        fs::symlink_metadata(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn open_dir(&self, path: &Path) -> io::Result<StdDirectory> {
        fs::read_dir(path).map(|inner| StdDirectory { inner })
    }
}

/// Directory handle returned by [`StdFileSystem`].
#[derive(Debug)]
pub struct StdDirectory {
    inner: fs::ReadDir,
}

impl DirectoryHandle for StdDirectory {
    fn read_names(&mut self) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in self.inner.by_ref() {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn close(self) -> io::Result<()> {
        // std releases the descriptor on drop and swallows closedir failures.
        drop(self.inner);
        Ok(())
    }
}
