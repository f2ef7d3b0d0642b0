use crate::cli::commands::{run_checksum, run_process};
use bricks_core::{ConfiguredProvider, ProviderMeta};

#[test]
fn checksum_of_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.csv");
    std::fs::write(&path, "a,b\n").unwrap();
    run_checksum(&path).unwrap();
}

#[test]
fn checksum_of_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.csv");
    let err = run_checksum(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("gone.csv"));
}

#[test]
fn process_rejects_non_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, "<html></html>").unwrap();
    let provider = ConfiguredProvider::new(ProviderMeta::new()).unwrap();
    let err = run_process(&provider, &path).unwrap_err();
    assert!(err.to_string().contains("unsupported file type html"));
}
