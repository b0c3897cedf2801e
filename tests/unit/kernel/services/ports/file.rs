use super::*;

#[test]
fn test_dir_entry_new() {
    let entry = DirEntry::new(PathBuf::from("/notes/today.md"), true);
    assert_eq!(entry.name, "today.md");
    assert!(entry.is_file);
}

#[test]
fn test_file_error_display() {
    let err = FileError::NotFound(PathBuf::from("/notes/missing.md"));
    assert!(err.to_string().contains("/notes/missing.md"));
}

#[test]
fn test_io_error_is_exposed_as_source() {
    use std::error::Error;

    let err = FileError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    assert!(err.source().is_some());
    assert!(FileError::NotAFile(PathBuf::from("/notes")).source().is_none());
}
