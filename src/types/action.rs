//! CopyAction - What the tree copier does with one source entry

use super::{EntryKind, ResolvedTarget, Resolution, SourceEntry, TargetKind};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Copy strategy chosen for a source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyAction {
    /// Copy the entry's bytes (or the link itself for symlinks)
    RegularFile,

    /// Create the directory and copy its children
    RegularDir,

    /// Copy the target file's bytes under the alias name
    AliasToFile(ResolvedTarget),

    /// Copy the target directory's subtree under the alias name
    AliasToDir(ResolvedTarget),

    /// Copy the alias file itself, since its target is unknown
    UnresolvedAlias,

    /// Skip a FIFO, socket or device node and report it
    Special,
}

impl CopyAction {
    /// Pick the strategy for `entry` given what the resolver said about it
    pub fn classify(entry: &SourceEntry, resolution: Resolution) -> Self {
        match resolution {
            Resolution::NotAlias => match entry.kind {
                EntryKind::Directory => CopyAction::RegularDir,
                EntryKind::File | EntryKind::Symlink => CopyAction::RegularFile,
                EntryKind::Other => CopyAction::Special,
            },
            Resolution::Resolved(target) => match target.kind {
                TargetKind::File => CopyAction::AliasToFile(target),
                TargetKind::Directory => CopyAction::AliasToDir(target),
            },
            Resolution::Unresolved => CopyAction::UnresolvedAlias,
        }
    }

    /// Name under which `entry` is written in the destination directory.
    ///
    /// File aliases gain their target's extension unless the alias name
    /// already ends with it (compared ASCII case-insensitively). Every other
    /// action keeps the source name.
    pub fn destination_name(&self, entry: &SourceEntry) -> OsString {
        match self {
            CopyAction::AliasToFile(target) => {
                with_target_extension(&entry.name, &target.extension())
            }
            CopyAction::RegularFile
            | CopyAction::RegularDir
            | CopyAction::AliasToDir(_)
            | CopyAction::UnresolvedAlias
            | CopyAction::Special => entry.name.clone(),
        }
    }

    /// Path whose content ends up in the destination
    pub fn content_path<'a>(&'a self, entry: &'a SourceEntry) -> &'a Path {
        match self {
            CopyAction::AliasToFile(target) | CopyAction::AliasToDir(target) => &target.path,
            CopyAction::RegularFile
            | CopyAction::RegularDir
            | CopyAction::UnresolvedAlias
            | CopyAction::Special => &entry.path,
        }
    }

    /// Get a human-readable name for the action
    pub fn action_name(&self) -> &'static str {
        match self {
            CopyAction::RegularFile => "file",
            CopyAction::RegularDir => "dir",
            CopyAction::AliasToFile(_) => "alias-file",
            CopyAction::AliasToDir(_) => "alias-dir",
            CopyAction::UnresolvedAlias => "unresolved",
            CopyAction::Special => "special",
        }
    }
}

fn with_target_extension(name: &OsStr, extension: &OsStr) -> OsString {
    if extension.is_empty() || ends_with_ignore_ascii_case(name, extension) {
        return name.to_os_string();
    }
    let mut renamed = name.to_os_string();
    renamed.push(extension);
    renamed
}

fn ends_with_ignore_ascii_case(name: &OsStr, suffix: &OsStr) -> bool {
    let name = name.as_encoded_bytes();
    let suffix = suffix.as_encoded_bytes();
    name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, kind: EntryKind) -> SourceEntry {
        SourceEntry::new(PathBuf::from("/src").join(name), OsString::from(name), kind)
    }

    fn file_target(path: &str) -> ResolvedTarget {
        ResolvedTarget::new(PathBuf::from(path), TargetKind::File)
    }

    fn dir_target(path: &str) -> ResolvedTarget {
        ResolvedTarget::new(PathBuf::from(path), TargetKind::Directory)
    }

    #[test]
    fn test_classify_regular_entries() {
        assert_eq!(
            CopyAction::classify(&entry("a.txt", EntryKind::File), Resolution::NotAlias),
            CopyAction::RegularFile
        );
        assert_eq!(
            CopyAction::classify(&entry("docs", EntryKind::Directory), Resolution::NotAlias),
            CopyAction::RegularDir
        );
        assert_eq!(
            CopyAction::classify(&entry("link", EntryKind::Symlink), Resolution::NotAlias),
            CopyAction::RegularFile
        );
        assert_eq!(
            CopyAction::classify(&entry("pipe", EntryKind::Other), Resolution::NotAlias),
            CopyAction::Special
        );
    }

    #[test]
    fn test_classify_aliases() {
        let alias = entry("Report", EntryKind::File);
        assert_eq!(
            CopyAction::classify(&alias, Resolution::Resolved(file_target("/d/Summary.pdf"))),
            CopyAction::AliasToFile(file_target("/d/Summary.pdf"))
        );
        assert_eq!(
            CopyAction::classify(&alias, Resolution::Resolved(dir_target("/d/Archive"))),
            CopyAction::AliasToDir(dir_target("/d/Archive"))
        );
        assert_eq!(
            CopyAction::classify(&alias, Resolution::Unresolved),
            CopyAction::UnresolvedAlias
        );
    }

    #[test]
    fn test_file_alias_gains_target_extension() {
        let action = CopyAction::AliasToFile(file_target("/d/Summary.pdf"));
        let name = action.destination_name(&entry("Report", EntryKind::File));
        assert_eq!(name, OsString::from("Report.pdf"));
    }

    #[test]
    fn test_file_alias_extension_not_doubled() {
        let action = CopyAction::AliasToFile(file_target("/d/Summary.pdf"));
        let name = action.destination_name(&entry("Report.pdf", EntryKind::File));
        assert_eq!(name, OsString::from("Report.pdf"));
    }

    #[test]
    fn test_file_alias_extension_check_ignores_case() {
        let action = CopyAction::AliasToFile(file_target("/d/Summary.pdf"));
        let name = action.destination_name(&entry("Report.PDF", EntryKind::File));
        assert_eq!(name, OsString::from("Report.PDF"));
    }

    #[test]
    fn test_file_alias_without_target_extension_keeps_name() {
        let action = CopyAction::AliasToFile(file_target("/d/LICENSE"));
        let name = action.destination_name(&entry("license alias", EntryKind::File));
        assert_eq!(name, OsString::from("license alias"));
    }

    #[test]
    fn test_other_extension_is_appended() {
        let action = CopyAction::AliasToFile(file_target("/d/photo.jpg"));
        let name = action.destination_name(&entry("photo.png", EntryKind::File));
        assert_eq!(name, OsString::from("photo.png.jpg"));
    }

    #[test]
    fn test_directory_alias_keeps_name() {
        let action = CopyAction::AliasToDir(dir_target("/d/2023-Archive"));
        let name = action.destination_name(&entry("Photos", EntryKind::File));
        assert_eq!(name, OsString::from("Photos"));
    }

    #[test]
    fn test_unresolved_and_regular_keep_name() {
        let alias = entry("Broken", EntryKind::File);
        assert_eq!(
            CopyAction::UnresolvedAlias.destination_name(&alias),
            OsString::from("Broken")
        );
        assert_eq!(
            CopyAction::RegularFile.destination_name(&entry("a.txt", EntryKind::File)),
            OsString::from("a.txt")
        );
    }

    #[test]
    fn test_content_path_follows_alias_target() {
        let alias = entry("linkToA", EntryKind::File);
        let action = CopyAction::AliasToFile(file_target("/src/a.txt"));
        assert_eq!(action.content_path(&alias), Path::new("/src/a.txt"));
        assert_eq!(
            CopyAction::UnresolvedAlias.content_path(&alias),
            Path::new("/src/linkToA")
        );
    }

    #[test]
    fn test_action_names() {
        assert_eq!(CopyAction::RegularFile.action_name(), "file");
        assert_eq!(CopyAction::AliasToDir(dir_target("/d")).action_name(), "alias-dir");
        assert_eq!(CopyAction::UnresolvedAlias.action_name(), "unresolved");
    }
}
