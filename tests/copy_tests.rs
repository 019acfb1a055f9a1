//! Tests for atomic file copy operations

use dealias::executor::copy_file_atomic;
use dealias::DealiasError;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn create_test_file(path: &PathBuf, content: &[u8]) {
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(content)
        .expect("Failed to write test content");
    file.flush().expect("Failed to flush");
}

fn set_file_mtime(path: &PathBuf, mtime: SystemTime) {
    let filetime_mtime = filetime::FileTime::from_system_time(mtime);
    filetime::set_file_mtime(path, filetime_mtime).expect("Failed to set mtime");
}

#[test]
fn test_copy_basic_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    let content = b"Hello, dealias! This is a test file.";
    create_test_file(&src_path, content);

    let dest_path = root.join("dest.txt");

    let bytes_copied =
        copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    assert_eq!(bytes_copied, content.len() as u64);

    let dest_content = fs::read(&dest_path).expect("Failed to read dest file");
    assert_eq!(dest_content, content);
}

#[test]
fn test_copy_overwrites_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"short");

    let dest_path = root.join("dest.txt");
    create_test_file(&dest_path, b"a much longer previous version");

    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should overwrite");

    let dest_content = fs::read(&dest_path).expect("Failed to read dest file");
    assert_eq!(dest_content, b"short");
}

#[test]
fn test_copy_into_missing_directory_fails_cleanly() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    let dest_path = root.join("missing/dest.txt");
    let result = copy_file_atomic(&src_path, &dest_path);

    match result {
        Err(DealiasError::Entry { path, .. }) => {
            assert_eq!(path, root.join("missing/dest.txt.part"));
        }
        other => panic!("expected entry error, got {:?}", other),
    }
    assert!(!dest_path.exists());
}

#[test]
fn test_copy_onto_directory_keeps_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    let dest_path = root.join("occupied");
    fs::create_dir(&dest_path).expect("Failed to create dir");
    fs::write(dest_path.join("inside.txt"), b"keep").expect("Failed to write file");

    let result = copy_file_atomic(&src_path, &dest_path);
    assert!(result.is_err());
    assert!(dest_path.join("inside.txt").exists());
    assert!(
        !root.join("occupied.part").exists(),
        ".part file should be cleaned up after a failed rename"
    );
}

#[test]
fn test_copy_preserves_mtime() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    let mtime = SystemTime::now() - Duration::from_secs(3600);
    set_file_mtime(&src_path, mtime);

    let dest_path = root.join("dest.txt");

    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    let src_metadata = fs::metadata(&src_path).expect("Failed to read src metadata");
    let dest_metadata = fs::metadata(&dest_path).expect("Failed to read dest metadata");

    let src_mtime = src_metadata.modified().expect("Failed to get src mtime");
    let dest_mtime = dest_metadata.modified().expect("Failed to get dest mtime");

    let diff = if src_mtime > dest_mtime {
        src_mtime.duration_since(dest_mtime).unwrap()
    } else {
        dest_mtime.duration_since(src_mtime).unwrap()
    };

    assert!(
        diff < Duration::from_secs(2),
        "mtime should be preserved (diff: {:?})",
        diff
    );
}

#[test]
fn test_copy_removes_part_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    let dest_path = root.join("dest.txt");

    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    let part_path = root.join("dest.txt.part");
    assert!(
        !part_path.exists(),
        ".part file should be removed after successful copy"
    );

    assert!(dest_path.exists());
}

#[test]
fn test_copy_large_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("large.bin");
    let size = 1024 * 1024;
    let content: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
    create_test_file(&src_path, &content);

    let dest_path = root.join("large_copy.bin");

    let bytes_copied = copy_file_atomic(&src_path, &dest_path)
        .expect("copy_file_atomic should handle large files");

    assert_eq!(bytes_copied, size as u64);

    let dest_content = fs::read(&dest_path).expect("Failed to read dest file");
    assert_eq!(dest_content, content);
}

#[test]
fn test_copy_preserves_permissions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    create_test_file(&src_path, b"test content");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&src_path)
            .expect("Failed to get metadata")
            .permissions();
        perms.set_mode(0o444);
        fs::set_permissions(&src_path, perms).expect("Failed to set permissions");
    }

    let dest_path = root.join("dest.txt");

    copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let src_perms = fs::metadata(&src_path)
            .expect("Failed to get src metadata")
            .permissions();
        let dest_perms = fs::metadata(&dest_path)
            .expect("Failed to get dest metadata")
            .permissions();

        assert_eq!(
            src_perms.mode() & 0o777,
            dest_perms.mode() & 0o777,
            "Permissions should be preserved"
        );
    }
}
