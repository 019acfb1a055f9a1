//! Alias-aware tree copier
//!
//! Walks the source depth first. Every entry is classified through the
//! resolver into a [`CopyAction`], which decides both the destination name
//! and how the content is produced. Failures on one entry are recorded and
//! the walk moves on to its siblings.

use crate::executor::{copy_file_atomic, copy_verbatim, ensure_dir};
use crate::resolver::AliasResolver;
use crate::types::{CopyAction, DealiasError, Resolution, ResolvedTarget, SourceEntry};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Counters for a finished walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Files written, including alias targets and verbatim alias copies
    pub files_copied: usize,
    /// Directories created below the destination root
    pub directories_created: usize,
    /// Aliases replaced by their target
    pub aliases_resolved: usize,
    /// Aliases copied as-is because their target was unknown
    pub aliases_unresolved: usize,
    pub bytes_copied: u64,
    /// Entries that could not be copied
    pub failed_entries: usize,
}

/// Events emitted while walking the tree
#[derive(Debug)]
pub enum CopyEvent<'a> {
    /// An alias was resolved to a real item
    AliasResolved {
        alias: &'a Path,
        target: &'a ResolvedTarget,
    },
    /// An alias could not be resolved; it is copied verbatim
    AliasUnresolved { alias: &'a Path },
    /// A directory was created (or reused) in the destination
    DirectoryCreated { src: &'a Path, dest: &'a Path },
    /// A file was written to the destination
    FileCopied {
        action: &'static str,
        src: &'a Path,
        dest: &'a Path,
        bytes: u64,
    },
    /// `dest` was already written earlier in this run and is about to be
    /// replaced by `src`
    NameCollision { src: &'a Path, dest: &'a Path },
    /// An entry failed; the walk continues
    EntryFailed {
        path: &'a Path,
        error: &'a DealiasError,
    },
}

/// Optional callback used to receive copy events.
pub type CopyCallback<'a> = dyn Fn(&CopyEvent<'_>) + 'a;

/// Result of a walk that reached the end
#[derive(Debug, Default)]
pub struct CopyReport {
    pub stats: CopyStats,
    /// Source path and error for every failed entry, in walk order
    pub failures: Vec<(PathBuf, DealiasError)>,
}

impl CopyReport {
    /// True when every entry was copied
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Copies a directory tree, replacing aliases with what they point to
pub struct TreeCopier<'a> {
    resolver: &'a dyn AliasResolver,
    on_event: Option<&'a CopyCallback<'a>>,
    stats: CopyStats,
    failures: Vec<(PathBuf, DealiasError)>,
    /// Canonical paths of the source directories currently being copied
    active_dirs: Vec<PathBuf>,
    /// Canonical destination root
    dest_root: PathBuf,
    /// Destination paths produced so far
    written: HashSet<PathBuf>,
}

impl<'a> TreeCopier<'a> {
    pub fn new(resolver: &'a dyn AliasResolver) -> Self {
        Self {
            resolver,
            on_event: None,
            stats: CopyStats::default(),
            failures: Vec::new(),
            active_dirs: Vec::new(),
            dest_root: PathBuf::new(),
            written: HashSet::new(),
        }
    }

    /// Receive a [`CopyEvent`] for every step of the walk
    pub fn on_event(mut self, callback: &'a CopyCallback<'a>) -> Self {
        self.on_event = Some(callback);
        self
    }

    /// Copy the contents of `source_root` into `dest_root`.
    ///
    /// `dest_root` is created if missing. Only a failure to create or read
    /// the roots is returned as `Err`; everything below them is recorded in
    /// the report.
    pub fn copy_tree(
        mut self,
        source_root: &Path,
        dest_root: &Path,
    ) -> Result<CopyReport, DealiasError> {
        ensure_dir(dest_root)?;
        self.dest_root = canonical_or_self(dest_root);
        self.copy_children(source_root, dest_root)?;

        Ok(CopyReport {
            stats: self.stats,
            failures: self.failures,
        })
    }

    fn copy_children(&mut self, src_dir: &Path, dest_dir: &Path) -> Result<(), DealiasError> {
        let mut children = Vec::new();
        for entry in fs::read_dir(src_dir).map_err(|e| DealiasError::entry(src_dir, e))? {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(e) => self.record_failure(src_dir, DealiasError::entry(src_dir, e)),
            }
        }
        children.sort();

        self.active_dirs.push(canonical_or_self(src_dir));
        for child in &children {
            self.copy_entry(child, dest_dir);
        }
        self.active_dirs.pop();

        Ok(())
    }

    fn copy_entry(&mut self, src: &Path, dest_dir: &Path) {
        let entry = match SourceEntry::from_path(src) {
            Ok(entry) => entry,
            Err(e) => {
                self.record_failure(src, DealiasError::entry(src, e));
                return;
            }
        };

        let resolution = if entry.is_special() {
            Resolution::NotAlias
        } else {
            self.resolver.resolve(&entry.path)
        };
        let action = CopyAction::classify(&entry, resolution);
        match &action {
            CopyAction::AliasToFile(target) | CopyAction::AliasToDir(target) => {
                self.stats.aliases_resolved += 1;
                self.emit(CopyEvent::AliasResolved {
                    alias: &entry.path,
                    target,
                });
            }
            CopyAction::UnresolvedAlias => {
                self.stats.aliases_unresolved += 1;
                self.emit(CopyEvent::AliasUnresolved { alias: &entry.path });
            }
            CopyAction::RegularFile | CopyAction::RegularDir | CopyAction::Special => {}
        }

        let dest = dest_dir.join(action.destination_name(&entry));
        if action != CopyAction::Special && !self.written.insert(dest.clone()) {
            self.emit(CopyEvent::NameCollision {
                src: &entry.path,
                dest: &dest,
            });
        }
        if let Err(error) = self.apply(&entry, &action, &dest) {
            self.record_failure(&entry.path, error);
        }
    }

    fn apply(
        &mut self,
        entry: &SourceEntry,
        action: &CopyAction,
        dest: &Path,
    ) -> Result<(), DealiasError> {
        let src = action.content_path(entry);
        match action {
            CopyAction::RegularFile | CopyAction::UnresolvedAlias => {
                let bytes = copy_verbatim(src, dest)?;
                self.file_copied(action, src, dest, bytes);
            }
            CopyAction::AliasToFile(_) => {
                let bytes = copy_file_atomic(src, dest)?;
                self.file_copied(action, src, dest, bytes);
            }
            CopyAction::RegularDir => self.copy_directory(src, dest)?,
            CopyAction::AliasToDir(target) => {
                self.check_cycle(entry, target)?;
                self.copy_directory(src, dest)?;
            }
            CopyAction::Special => {
                return Err(DealiasError::SpecialFile {
                    path: entry.path.clone(),
                })
            }
        }
        Ok(())
    }

    fn copy_directory(&mut self, src_dir: &Path, dest_dir: &Path) -> Result<(), DealiasError> {
        ensure_dir(dest_dir)?;
        self.stats.directories_created += 1;
        self.emit(CopyEvent::DirectoryCreated {
            src: src_dir,
            dest: dest_dir,
        });
        self.copy_children(src_dir, dest_dir)
    }

    /// A directory alias must not lead back into a folder that is still
    /// being copied, into one that holds the destination, or into the
    /// destination itself, whose contents grow while they are read.
    fn check_cycle(
        &self,
        entry: &SourceEntry,
        target: &ResolvedTarget,
    ) -> Result<(), DealiasError> {
        let target_dir = canonical_or_self(&target.path);
        let loops_back = self.active_dirs.iter().any(|dir| dir == &target_dir);
        if loops_back
            || self.dest_root.starts_with(&target_dir)
            || target_dir.starts_with(&self.dest_root)
        {
            return Err(DealiasError::AliasCycle {
                alias: entry.path.clone(),
                target: target.path.clone(),
            });
        }
        Ok(())
    }

    fn file_copied(&mut self, action: &CopyAction, src: &Path, dest: &Path, bytes: u64) {
        self.stats.files_copied += 1;
        self.stats.bytes_copied += bytes;
        self.emit(CopyEvent::FileCopied {
            action: action.action_name(),
            src,
            dest,
            bytes,
        });
    }

    fn record_failure(&mut self, path: &Path, error: DealiasError) {
        self.stats.failed_entries += 1;
        self.emit(CopyEvent::EntryFailed {
            path,
            error: &error,
        });
        self.failures.push((path.to_path_buf(), error));
    }

    fn emit(&self, event: CopyEvent<'_>) {
        if let Some(callback) = self.on_event {
            callback(&event);
        }
    }
}

fn canonical_or_self(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
