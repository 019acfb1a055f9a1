//! Atomic file copy implementation

use crate::types::DealiasError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Write to a `<name>.part` sibling of `dest`
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename over `dest`
///
/// `src` is opened normally, so a symlink is followed. An existing file at
/// `dest` is replaced; an existing directory makes the rename fail. The
/// `.part` file is removed when any step fails.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(DealiasError)` - IO error tagged with the failing path
///
/// # Example
/// ```no_run
/// use dealias::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), dealias::DealiasError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, DealiasError> {
    let part_path = part_path_for(dest);

    match write_part_file(src, &part_path) {
        Ok(total_bytes) => {
            if let Err(e) = fs::rename(&part_path, dest) {
                let _ = fs::remove_file(&part_path);
                return Err(DealiasError::entry(dest, e));
            }
            Ok(total_bytes)
        }
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            Err(e)
        }
    }
}

fn write_part_file(src: &Path, part_path: &Path) -> Result<u64, DealiasError> {
    let mut src_file = File::open(src).map_err(|e| DealiasError::entry(src, e))?;
    let mut part_file = File::create(part_path).map_err(|e| DealiasError::entry(part_path, e))?;

    let total_bytes =
        stream(&mut src_file, &mut part_file).map_err(|e| DealiasError::entry(src, e))?;

    // Force the data to disk before the rename makes it visible
    part_file
        .sync_all()
        .map_err(|e| DealiasError::entry(part_path, e))?;
    drop(part_file);

    let src_metadata = src_file
        .metadata()
        .map_err(|e| DealiasError::entry(src, e))?;
    fs::set_permissions(part_path, src_metadata.permissions())
        .map_err(|e| DealiasError::entry(part_path, e))?;

    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(part_path, mtime).map_err(|e| DealiasError::entry(part_path, e))?;

    Ok(total_bytes)
}

fn stream(src: &mut File, dest: &mut File) -> io::Result<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        dest.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    Ok(total_bytes)
}

/// `dir/name` -> `dir/name.part`
///
/// The suffix is appended rather than swapped in so that `a.txt` and `a.md`
/// never share a temporary file.
fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".part");
    dest.with_file_name(name)
}
