//! End-to-end tests for the `refetch` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resource() -> Vec<u8> {
    (0..1000u32).map(|i| (i % 251) as u8).collect()
}

fn refetch() -> Command {
    Command::cargo_bin("refetch").expect("binary should be built")
}

#[test]
fn test_missing_url_prints_usage() {
    refetch()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_extra_argument_is_rejected() {
    refetch()
        .args(["https://example.com/a.bin", "https://example.com/b.bin"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_url_fails_without_creating_a_file() {
    let temp_dir = TempDir::new().unwrap();

    refetch()
        .current_dir(temp_dir.path())
        .arg("not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid URL"));

    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_prints_name_and_size() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/file.bin"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Accept-Ranges", "bytes")
                .set_body_bytes(resource()),
        )
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let url = format!("{}/data/file.bin", mock_server.uri());

    refetch()
        .current_dir(temp_dir.path())
        .arg(&url)
        .assert()
        .success()
        .stdout("file.bin 1000 bytes\n");

    assert_eq!(std::fs::read(temp_dir.path().join("file.bin")).unwrap(), resource());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rerun_resumes_partial_file() {
    let full = resource();
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/file.bin"))
        .and(header("Range", "bytes=400-"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Accept-Ranges", "bytes")
                .set_body_bytes(full[400..].to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("file.bin"), &full[..400]).unwrap();
    let url = format!("{}/data/file.bin", mock_server.uri());

    refetch()
        .current_dir(temp_dir.path())
        .arg(&url)
        .assert()
        .success()
        .stdout("file.bin 1000 bytes\n");

    assert_eq!(std::fs::read(temp_dir.path().join("file.bin")).unwrap(), full);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_rejection_exits_non_zero() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.bin"))
        .respond_with(ResponseTemplate::new(410).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let url = format!("{}/gone.bin", mock_server.uri());

    refetch()
        .current_dir(temp_dir.path())
        .arg(&url)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("410 Gone"));
}
