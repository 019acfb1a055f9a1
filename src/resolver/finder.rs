//! Finder-backed alias resolution (macOS)
//!
//! Detection asks Spotlight metadata for the content type; resolution asks
//! Finder for the alias's original item through AppleScript. Each query is
//! one child process and blocks until it exits.

use super::AliasResolver;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const MDLS_BIN: &str = "/usr/bin/mdls";
const OSASCRIPT_BIN: &str = "/usr/bin/osascript";

/// Content type Spotlight reports for Finder alias files
pub const ALIAS_CONTENT_TYPE: &str = "com.apple.alias-file";

const RESOLVE_ALIAS_SCRIPT: &str = r#"on run argv
    set theItem to POSIX file (item 1 of argv)
    tell application "Finder"
        set resolved to (original item of (theItem as alias)) as alias
        return POSIX path of resolved
    end tell
end run
"#;

/// Resolver that shells out to `mdls` and `osascript`
#[derive(Debug, Clone)]
pub struct FinderResolver {
    mdls_bin: PathBuf,
    osascript_bin: PathBuf,
}

impl Default for FinderResolver {
    fn default() -> Self {
        Self::with_binaries(MDLS_BIN, OSASCRIPT_BIN)
    }
}

impl FinderResolver {
    /// Use the given `mdls` and `osascript` executables
    pub fn with_binaries(mdls_bin: impl Into<PathBuf>, osascript_bin: impl Into<PathBuf>) -> Self {
        Self {
            mdls_bin: mdls_bin.into(),
            osascript_bin: osascript_bin.into(),
        }
    }
}

impl AliasResolver for FinderResolver {
    fn is_alias(&self, path: &Path) -> bool {
        let output = Command::new(&self.mdls_bin)
            .args(["-name", "kMDItemContentType", "-raw"])
            .arg(path)
            .output();

        successful_stdout(output).is_some_and(|content_type| content_type == ALIAS_CONTENT_TYPE)
    }

    fn resolve_alias(&self, path: &Path) -> Option<PathBuf> {
        let output = Command::new(&self.osascript_bin)
            .arg("-e")
            .arg(RESOLVE_ALIAS_SCRIPT)
            .arg("--")
            .arg(path)
            .output();

        successful_stdout(output).and_then(|posix_path| parse_posix_path(&posix_path))
    }
}

/// Trimmed stdout of a process that started and exited zero
fn successful_stdout(output: std::io::Result<Output>) -> Option<String> {
    let output = output.ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Turn AppleScript's `POSIX path` result into a path.
///
/// Folders come back with a trailing `/`, which is dropped.
fn parse_posix_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some(PathBuf::from("/"));
    }
    Some(PathBuf::from(OsStr::new(trimmed)))
}
