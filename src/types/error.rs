//! Error types for dealias

use std::path::PathBuf;
use thiserror::Error;

/// Error types for dealias operations
#[derive(Debug, Error)]
pub enum DealiasError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source path is missing
    #[error("source does not exist: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Source path exists but is not a directory
    #[error("source is not a directory: {}", .path.display())]
    SourceNotDirectory { path: PathBuf },

    /// Source and destination resolve to the same directory
    #[error("source and destination are the same directory: {}", .path.display())]
    SameDirectory { path: PathBuf },

    /// Destination resolves to a path below the source
    #[error(
        "destination cannot be inside the source directory: {} is inside {}",
        .destination.display(),
        .source_dir.display()
    )]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    /// A directory was needed where something else already exists
    #[error("destination exists and is not a directory: {}", .path.display())]
    DestinationNotDirectory { path: PathBuf },

    /// A FIFO, socket or device node, which has no content to copy
    #[error("not a regular file or directory: {}", .path.display())]
    SpecialFile { path: PathBuf },

    /// A directory alias points at a folder that is already being copied
    #[error("alias {} points to {}, which contains the copy in progress", .alias.display(), .target.display())]
    AliasCycle { alias: PathBuf, target: PathBuf },

    /// IO failure tied to a single tree entry
    #[error("{}: {source}", .path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The walk finished but some entries could not be copied
    #[error("copy finished with failures: {failed} entries could not be copied")]
    Incomplete { failed: usize },
}

impl DealiasError {
    /// Wrap an IO error with the path of the entry that caused it.
    pub fn entry(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DealiasError::Entry {
            path: path.into(),
            source,
        }
    }

    /// Errors detected before any copying starts
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            DealiasError::SourceNotFound { .. }
                | DealiasError::SourceNotDirectory { .. }
                | DealiasError::SameDirectory { .. }
                | DealiasError::DestinationInsideSource { .. }
        )
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            DealiasError::Io(e) | DealiasError::Entry { source: e, .. } => {
                e.kind() == std::io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// Short label used to group errors in summaries
    pub fn kind_label(&self) -> &'static str {
        match self {
            DealiasError::Io(_) | DealiasError::Entry { .. } if self.is_permission_error() => {
                "Permission denied"
            }
            DealiasError::Io(_) | DealiasError::Entry { .. } => "I/O error",
            DealiasError::SourceNotFound { .. } | DealiasError::SourceNotDirectory { .. } => {
                "Invalid source"
            }
            DealiasError::SameDirectory { .. } | DealiasError::DestinationInsideSource { .. } => {
                "Invalid destination"
            }
            DealiasError::DestinationNotDirectory { .. } => "Type conflict",
            DealiasError::SpecialFile { .. } => "Unsupported file type",
            DealiasError::AliasCycle { .. } => "Alias cycle",
            DealiasError::Incomplete { .. } => "Incomplete copy",
        }
    }
}
