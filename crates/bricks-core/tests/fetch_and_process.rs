//! Integration tests: header probe, fetch composition and processing of fetched bricks.

mod common;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use bricks_core::checksum;
use bricks_core::transport::{self, CurlOptions};
use bricks_core::{
    ConfiguredProvider, DataProvider, FetchError, FileKind, Processed, ProviderError,
    ProviderMeta,
};
use common::policy_server::{self, Route};

const ALLOW_ALL: &str = "User-agent: *\nDisallow:\n";

fn provider_in(dir: &Path, extra: &str) -> ConfiguredProvider {
    let mut meta: ProviderMeta = toml::from_str(extra).unwrap();
    meta.insert(
        "download_dir".into(),
        toml::Value::String(dir.display().to_string()),
    );
    meta.insert("connect_timeout_secs".into(), toml::Value::Integer(2));
    meta.insert("timeout_secs".into(), toml::Value::Integer(5));
    ConfiguredProvider::new(meta).unwrap()
}

fn zip_bytes(members: &[(&str, &str)]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.zip");
    let mut w = zip::ZipWriter::new(File::create(&path).unwrap());
    for (name, data) in members {
        w.start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        w.write_all(data.as_bytes()).unwrap();
    }
    w.finish().unwrap();
    std::fs::read(&path).unwrap()
}

#[test]
fn check_headers_returns_declared_content_type() {
    let server = policy_server::start(vec![
        ("/page", Route::ok(Some("text/html; charset=UTF-8"), "<html></html>")),
        ("/bare", Route::ok(None, "raw")),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let p = provider_in(dir.path(), "");
    assert_eq!(
        p.check_headers(&server.url("/page")).unwrap().as_deref(),
        Some("text/html; charset=UTF-8")
    );
    assert_eq!(p.check_headers(&server.url("/bare")).unwrap(), None);
}

#[test]
fn head_content_length_matches_fetched_size() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/rows.csv", Route::ok(Some("text/csv"), "a,b\n1,2\n")),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");
    let url = server.url("/rows.csv");

    let head = transport::probe(&url, &CurlOptions::from(p.settings())).unwrap();
    assert_eq!(head.content_length, Some(8));
    assert!(p.fetch(&url).unwrap());
    assert_eq!(Some(p.files()[0].size), head.content_length);
}

#[test]
fn check_headers_reports_http_errors() {
    let server = policy_server::start(vec![]);
    let dir = tempfile::tempdir().unwrap();
    let p = provider_in(dir.path(), "");
    match p.check_headers(&server.url("/missing")) {
        Err(ProviderError::Fetch(FetchError::Http { method, status, .. })) => {
            assert_eq!(method, "HEAD");
            assert_eq!(status, 404);
        }
        other => panic!("expected HTTP 404, got {:?}", other),
    }
}

#[test]
fn denied_fetch_never_touches_the_resource() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots("User-agent: *\nDisallow: /\n")),
        ("/data/set.zip", Route::ok(Some("application/zip"), zip_bytes(&[("a", "1")]))),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");
    let url = server.url("/data/set.zip");

    assert!(!p.can_fetch(&url).unwrap());
    assert!(!p.fetch(&url).unwrap());
    assert!(p.files().is_empty());
    assert!(!server.requested("/data/set.zip"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn fetch_records_brick_and_processes_zip() {
    let body = zip_bytes(&[("rows.csv", "a,b\n1,2\n"), ("notes.txt", "hello")]);
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/data/set.zip", Route::ok(Some("application/zip"), body.clone())),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "extract_archives = true");
    let url = server.url("/data/set.zip");

    assert!(p.fetch(&url).unwrap());
    assert_eq!(p.files().len(), 1);
    let brick = p.files()[0].clone();
    assert_eq!(brick.url, url);
    assert_eq!(brick.path, dir.path().join("set.zip"));
    assert_eq!(brick.content_type.as_deref(), Some("application/zip"));
    assert_eq!(brick.size, body.len() as u64);
    assert_eq!(brick.sha256, checksum::sha256_reader(&body[..]).unwrap());
    assert!(!dir.path().join("set.zip.part").exists());

    let file = brick.open().unwrap();
    assert_eq!(file.kind(), FileKind::Zip);
    let Processed::Archive(summary) = p.process_file(file).unwrap();
    assert_eq!(summary.entries.len(), 2);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("set").join("notes.txt")).unwrap(),
        "hello"
    );
}

#[test]
fn fetched_html_is_reported_unsupported() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/index", Route::ok(Some("text/html"), "<html><body>hi</body></html>")),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");

    assert!(p.fetch(&server.url("/index")).unwrap());
    let brick = &p.files()[0];
    assert_eq!(brick.path, dir.path().join("index.html"));
    let file = brick.open().unwrap();
    assert!(matches!(
        p.process_file(file),
        Err(ProviderError::UnsupportedFileType {
            kind: FileKind::Html,
            ..
        })
    ));
}

#[test]
fn fetch_appends_in_order() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/one.csv", Route::ok(Some("text/csv"), "1\n")),
        ("/two.csv", Route::ok(Some("text/csv"), "2\n")),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");
    assert!(p.fetch(&server.url("/one.csv")).unwrap());
    assert!(p.fetch(&server.url("/two.csv")).unwrap());
    let names: Vec<_> = p
        .files()
        .iter()
        .map(|b| b.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["one.csv", "two.csv"]);
}

#[test]
fn same_named_bricks_keep_their_own_files() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/a/data.csv", Route::ok(Some("text/csv"), "first\n")),
        ("/b/data.csv", Route::ok(Some("text/csv"), "second, longer\n")),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");
    assert!(p.fetch(&server.url("/a/data.csv")).unwrap());
    assert!(p.fetch(&server.url("/b/data.csv")).unwrap());

    let files = p.files();
    assert_eq!(files[0].path, dir.path().join("data.csv"));
    assert_eq!(files[1].path, dir.path().join("data (1).csv"));
    for brick in files {
        let on_disk = std::fs::metadata(&brick.path).unwrap().len();
        assert_eq!(brick.size, on_disk);
        assert_eq!(brick.sha256, checksum::sha256_path(&brick.path).unwrap());
    }
    assert_eq!(std::fs::read_to_string(&files[0].path).unwrap(), "first\n");
    assert_eq!(
        std::fs::read_to_string(&files[1].path).unwrap(),
        "second, longer\n"
    );
}

#[test]
fn fetch_without_head_support_still_downloads() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/plain.txt", Route::ok(Some("text/plain"), "body").without_head()),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");
    assert!(p.fetch(&server.url("/plain.txt")).unwrap());
    let brick = &p.files()[0];
    assert_eq!(brick.content_type, None);
    assert_eq!(std::fs::read_to_string(&brick.path).unwrap(), "body");
}

#[test]
fn failed_get_leaves_nothing_behind() {
    let server = policy_server::start(vec![
        ("/robots.txt", Route::robots(ALLOW_ALL)),
        ("/gone.zip", Route::status(404).without_head()),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let mut p = provider_in(dir.path(), "");
    match p.fetch(&server.url("/gone.zip")) {
        Err(ProviderError::Fetch(FetchError::Http { method, status, .. })) => {
            assert_eq!(method, "GET");
            assert_eq!(status, 404);
        }
        other => panic!("expected GET 404, got {:?}", other),
    }
    assert!(p.files().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
