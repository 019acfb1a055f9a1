//! Alias resolution
//!
//! The copier only talks to the [`AliasResolver`] trait. Platform backends
//! implement the two primitive queries; chain following, existence checks and
//! kind classification live in the provided [`AliasResolver::resolve`].

mod finder;

pub use finder::FinderResolver;

use crate::types::{Resolution, ResolvedTarget, TargetKind};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of alias hops followed for one entry
pub const MAX_ALIAS_HOPS: usize = 10;

/// Query interface to the platform's alias service
pub trait AliasResolver {
    /// Whether `path` is an alias file. Failures answer `false`.
    fn is_alias(&self, path: &Path) -> bool;

    /// Path the alias at `path` points to, or `None` if resolution failed.
    fn resolve_alias(&self, path: &Path) -> Option<PathBuf>;

    /// Classify `path` and, for aliases, find the real target.
    ///
    /// Never fails: anything that goes wrong after `path` is known to be an
    /// alias yields [`Resolution::Unresolved`].
    fn resolve(&self, path: &Path) -> Resolution {
        if !self.is_alias(path) {
            return Resolution::NotAlias;
        }

        let Some(target) = self.follow_chain(path) else {
            return Resolution::Unresolved;
        };

        let kind = match fs::metadata(&target) {
            Ok(metadata) if metadata.is_dir() => TargetKind::Directory,
            Ok(metadata) if metadata.is_file() => TargetKind::File,
            // Missing, unreadable, or a FIFO/socket/device
            _ => return Resolution::Unresolved,
        };
        Resolution::Resolved(ResolvedTarget::new(target, kind))
    }

    /// Resolve `alias`, then keep resolving while the result is itself an
    /// alias, up to [`MAX_ALIAS_HOPS`] hops.
    fn follow_chain(&self, alias: &Path) -> Option<PathBuf> {
        let mut current = self.resolve_alias(alias)?;
        for _ in 1..MAX_ALIAS_HOPS {
            if !self.is_alias(&current) {
                return Some(current);
            }
            let next = self.resolve_alias(&current)?;
            if next == current {
                return Some(current);
            }
            current = next;
        }
        Some(current)
    }
}

/// Resolver that never reports an alias
///
/// Used where no alias service exists; the copy degrades to a plain
/// recursive copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainResolver;

impl AliasResolver for PlainResolver {
    fn is_alias(&self, _path: &Path) -> bool {
        false
    }

    fn resolve_alias(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// Table-driven resolver
///
/// Paths registered with [`StaticResolver::with_alias`] are aliases to the
/// given target; [`StaticResolver::with_broken_alias`] registers an alias
/// whose resolution fails. Everything else is an ordinary entry.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    aliases: HashMap<PathBuf, Option<PathBuf>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as pointing to `target`
    pub fn with_alias(mut self, alias: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.aliases.insert(alias.into(), Some(target.into()));
        self
    }

    /// Register `alias` as an alias that cannot be resolved
    pub fn with_broken_alias(mut self, alias: impl Into<PathBuf>) -> Self {
        self.aliases.insert(alias.into(), None);
        self
    }
}

impl AliasResolver for StaticResolver {
    fn is_alias(&self, path: &Path) -> bool {
        self.aliases.contains_key(path)
    }

    fn resolve_alias(&self, path: &Path) -> Option<PathBuf> {
        self.aliases.get(path).cloned().flatten()
    }
}

/// Resolver for the current platform
pub fn platform_resolver() -> Box<dyn AliasResolver> {
    #[cfg(target_os = "macos")]
    {
        Box::new(FinderResolver::default())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Box::new(PlainResolver)
    }
}
