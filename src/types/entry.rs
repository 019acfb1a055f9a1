//! SourceEntry - A single entry discovered while walking the source tree

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What an entry is on disk, without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks are copied as links, never followed
    Symlink,
    /// FIFO, socket or device node
    Other,
}

/// An entry under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Absolute path of the entry
    pub path: PathBuf,

    /// Last path component
    pub name: OsString,

    pub kind: EntryKind,
}

impl SourceEntry {
    /// Create a SourceEntry from its parts
    pub fn new(path: PathBuf, name: OsString, kind: EntryKind) -> Self {
        Self { path, name, kind }
    }

    /// Inspect `path` with `symlink_metadata` and build an entry for it
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| path.as_os_str().to_os_string());

        Ok(Self::new(path.to_path_buf(), name, kind))
    }

    /// Entries with no readable content; opening a FIFO would block
    pub fn is_special(&self) -> bool {
        self.kind == EntryKind::Other
    }
}
