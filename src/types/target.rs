//! Results of asking whether a path is an alias

use std::ffi::OsString;
use std::path::PathBuf;

/// Kind of the real item an alias points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// The real file or folder behind an alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute path of the target
    pub path: PathBuf,

    pub kind: TargetKind,
}

impl ResolvedTarget {
    pub fn new(path: PathBuf, kind: TargetKind) -> Self {
        Self { path, kind }
    }

    /// The target's extension including the leading dot (`".pdf"`).
    ///
    /// Empty for directories and for files without an extension.
    pub fn extension(&self) -> OsString {
        if self.kind == TargetKind::Directory {
            return OsString::new();
        }
        match self.path.extension() {
            Some(ext) if !ext.is_empty() => {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            }
            _ => OsString::new(),
        }
    }
}

/// Outcome of resolving one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path is an ordinary entry
    NotAlias,

    /// The path is an alias and its target exists
    Resolved(ResolvedTarget),

    /// The path is an alias but its target could not be determined
    Unresolved,
}
