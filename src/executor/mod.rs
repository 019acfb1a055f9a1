//! Copy primitives used by the tree copier
//!
//! Everything here works on a single path pair; walking and alias handling
//! live in [`crate::copier`].

pub mod copy;

pub use copy::copy_file_atomic;

use crate::types::DealiasError;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Make sure `path` is a directory, creating it (and parents) if missing.
///
/// An existing directory is reused as is. Anything else at `path` is an error.
pub fn ensure_dir(path: &Path) -> Result<(), DealiasError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(DealiasError::DestinationNotDirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|e| DealiasError::entry(path, e))
        }
        Err(e) => Err(DealiasError::entry(path, e)),
    }
}

/// Copy `src` to `dest` without following a symlink at `src`.
///
/// Symlinks are recreated pointing at the same target; everything else is
/// copied byte for byte with [`copy_file_atomic`].
pub fn copy_verbatim(src: &Path, dest: &Path) -> Result<u64, DealiasError> {
    let metadata = fs::symlink_metadata(src).map_err(|e| DealiasError::entry(src, e))?;
    if metadata.file_type().is_symlink() {
        copy_symlink(src, dest)
    } else {
        copy_file_atomic(src, dest)
    }
}

/// Copy a symlink without dereferencing its target.
///
/// An existing file or symlink at `dest` is replaced; an existing directory
/// is left alone and reported as a conflict.
pub fn copy_symlink(src: &Path, dest: &Path) -> Result<u64, DealiasError> {
    let target = fs::read_link(src).map_err(|e| DealiasError::entry(src, e))?;

    if let Ok(existing) = fs::symlink_metadata(dest) {
        if existing.file_type().is_dir() {
            return Err(DealiasError::entry(
                dest,
                Error::new(ErrorKind::AlreadyExists, "a directory is in the way"),
            ));
        }
        fs::remove_file(dest).map_err(|e| DealiasError::entry(dest, e))?;
    }

    create_symlink(&target, dest).map_err(|e| DealiasError::entry(dest, e))?;
    Ok(0)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link_path)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> std::io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => symlink_dir(target, link_path).map_err(|_| file_err),
    }
}
