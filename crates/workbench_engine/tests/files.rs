use std::fs;

use tempfile::TempDir;
use workbench_engine::{
    download_filename, read_import, read_upload, save_download, write_export, FailureKind,
};
use workbench_core::ErrorClass;

#[test]
fn export_lands_in_export_dir() {
    let temp = TempDir::new().unwrap();
    let path = write_export(temp.path(), "template.json", "{\n}").unwrap();
    assert_eq!(path, temp.path().join("template.json"));
    assert_eq!(fs::read_to_string(path).unwrap(), "{\n}");
}

#[test]
fn download_uses_attachment_name_by_default() {
    let temp = TempDir::new().unwrap();
    let path = save_download(temp.path(), None, "out-7", b"%PDF").unwrap();
    assert_eq!(path, temp.path().join(download_filename("out-7")));
    assert_eq!(path.file_name().unwrap(), "output_out-7.pdf");
}

#[test]
fn download_to_directory_or_explicit_file() {
    let temp = TempDir::new().unwrap();
    let elsewhere = temp.path().join("elsewhere");
    fs::create_dir(&elsewhere).unwrap();

    let into_dir = save_download(temp.path(), Some(elsewhere.as_path()), "o1", b"a").unwrap();
    assert_eq!(into_dir, elsewhere.join("output_o1.pdf"));

    let explicit = temp.path().join("filled.pdf");
    let named = save_download(temp.path(), Some(explicit.as_path()), "o1", b"b").unwrap();
    assert_eq!(named, explicit);
    assert_eq!(fs::read(named).unwrap(), b"b");
}

#[tokio::test]
async fn missing_import_file_is_a_validation_failure() {
    let temp = TempDir::new().unwrap();
    let err = read_import(&temp.path().join("missing.json"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
    assert_eq!(err.kind.class(), ErrorClass::Validation);
}

#[tokio::test]
async fn oversized_upload_is_refused_before_sending() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.pdf");
    fs::write(&path, vec![0u8; 64]).unwrap();

    let err = read_upload(&path, 32).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidInput);

    let (name, bytes) = read_upload(&path, 64).await.unwrap();
    assert_eq!(name, "big.pdf");
    assert_eq!(bytes.len(), 64);
}
