// tests/fs_abstraction.rs

use std::fs;
use std::path::Path;

use buildweb::fs::mock::MockFileSystem;
use buildweb::fs::{FileSystem, RealFileSystem};
use tempfile::tempdir;

#[test]
fn reset_dir_empties_an_existing_directory() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("public").join("javascripts");
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("app.js"), "old").unwrap();
    fs::write(dir.join("nested").join("lib.js"), "old").unwrap();

    RealFileSystem.reset_dir(&dir).unwrap();

    assert!(RealFileSystem.exists(&dir));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn reset_dir_creates_a_missing_directory() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("public").join("images");
    assert!(!RealFileSystem.exists(&dir));

    RealFileSystem.reset_dir(&dir).unwrap();

    assert!(dir.is_dir());
}

#[test]
fn reset_dir_fails_when_a_file_is_in_the_way() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("public");
    fs::write(&blocker, "not a dir").unwrap();

    let err = RealFileSystem.reset_dir(&blocker.join("images")).unwrap_err();
    assert!(format!("{err:#}").contains("images"));
}

#[test]
fn mock_records_resets_and_fails_on_request() {
    let mock = MockFileSystem::new();
    let shared = mock.clone();
    mock.fail_resets_of("public/images");

    shared.reset_dir(Path::new("public/stylesheets")).unwrap();
    assert!(shared.reset_dir(Path::new("public/images")).is_err());

    assert!(mock.exists(Path::new("public/stylesheets")));
    assert!(!mock.exists(Path::new("public/images")));
    assert_eq!(
        mock.resets(),
        vec![
            Path::new("public/stylesheets").to_path_buf(),
            Path::new("public/images").to_path_buf(),
        ]
    );
}
