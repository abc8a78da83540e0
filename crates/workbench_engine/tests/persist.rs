use std::fs;

use tempfile::TempDir;
use workbench_engine::{ensure_output_dir, AtomicFileWriter, PersistError};

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rewriting_an_export_replaces_it() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("template.json", b"{\n}").unwrap();
    assert_eq!(first.file_name().unwrap(), "template.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "{\n}");

    let second = writer.write("template.json", b"{\n  \"A\": 1\n}").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "{\n  \"A\": 1\n}");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("output_1.pdf", b"data");
    assert!(matches!(result, Err(PersistError::OutputDir(_))));
    assert!(!file_path.with_file_name("output_1.pdf").exists());
}

#[test]
fn filenames_with_directories_are_rejected() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    assert!(matches!(
        writer.write("../escape.json", b"{}"),
        Err(PersistError::FileName(_))
    ));
    assert!(matches!(writer.write("", b"{}"), Err(PersistError::FileName(_))));
}
