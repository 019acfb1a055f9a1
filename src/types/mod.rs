//! Core type definitions for dealias

mod action;
mod entry;
mod error;
mod target;

pub use action::CopyAction;
pub use entry::{EntryKind, SourceEntry};
pub use error::DealiasError;
pub use target::{Resolution, ResolvedTarget, TargetKind};
