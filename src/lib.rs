//! # dealias - Alias-resolving folder copy
//!
//! Copies a directory tree and replaces every Finder alias with a physical
//! copy of the file or folder it points to. Aliases keep their display name;
//! file aliases also take on the target's extension.
//!
//! The walk lives in [`copier::TreeCopier`]; alias lookups go through the
//! [`resolver::AliasResolver`] trait so the walk can run against any backend.

// Module declarations
pub mod commands;
pub mod config;
pub mod copier;
pub mod executor;
pub mod resolver;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use copier::{CopyEvent, CopyReport, CopyStats, TreeCopier};
pub use resolver::{AliasResolver, FinderResolver, PlainResolver, StaticResolver};
pub use types::{CopyAction, DealiasError, Resolution, ResolvedTarget, SourceEntry, TargetKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
