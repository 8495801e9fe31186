//! Live verification against a running server.

use std::time::Duration;

use tesla_key_server::verify::{Verifier, MAX_BODY_BYTES};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

mod common;
use common::{config_for, start_server, write_key, PEM};

#[tokio::test]
async fn test_verify_passes_for_served_key() {
    let dir = tempfile::tempdir().unwrap();
    write_key(dir.path(), "tesla-public-key.pem", PEM);
    let server = start_server(config_for(dir.path())).await;

    let verifier = Verifier::new(Duration::from_secs(10), 200).unwrap();
    let report = verifier.check(&server.key_url()).await;
    assert!(report.passed, "{}", report.summary());
    assert_eq!(report.status, Some(200));
    assert_eq!(report.preview, PEM);
}

#[tokio::test]
async fn test_verify_fails_when_key_missing() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(config_for(dir.path())).await;

    let verifier = Verifier::new(Duration::from_secs(10), 200).unwrap();
    let report = verifier.check(&server.key_url()).await;
    assert!(!report.passed);
    assert_eq!(report.status, Some(404));
    assert!(report.summary().contains("HTTP 404"));
}

#[tokio::test]
async fn test_verify_fails_without_pem_markers() {
    let dir = tempfile::tempdir().unwrap();
    write_key(dir.path(), "tesla-public-key.pem", "not a key");
    let server = start_server(config_for(dir.path())).await;

    let verifier = Verifier::new(Duration::from_secs(10), 3).unwrap();
    let report = verifier.check(&server.key_url()).await;
    assert!(!report.passed);
    assert!(!report.has_begin_marker);
    assert_eq!(report.preview, "not...");
}

#[tokio::test]
async fn test_verify_times_out_on_silent_peer() {
    // Accepts connections but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let verifier = Verifier::new(Duration::from_millis(300), 200).unwrap();
    let report = verifier.check(&format!("http://{}/key.pem", addr)).await;
    assert!(!report.passed);
    assert_eq!(report.status, None);
    assert!(report.error.is_some());
}

#[tokio::test]
async fn test_verify_keeps_status_when_body_is_cut() {
    // Promises 100 bytes, sends 5, then hangs up.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n-----")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let verifier = Verifier::new(Duration::from_secs(5), 200).unwrap();
    let report = verifier.check(&format!("http://{}/key.pem", addr)).await;
    assert!(!report.passed);
    assert_eq!(report.status, Some(200));
    assert!(report.error.is_some());
}

#[tokio::test]
async fn test_verify_reads_a_bounded_body() {
    let dir = tempfile::tempdir().unwrap();
    let oversized = format!(
        "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
        "A".repeat(MAX_BODY_BYTES * 2)
    );
    write_key(dir.path(), "tesla-public-key.pem", &oversized);
    let server = start_server(config_for(dir.path())).await;

    let verifier = Verifier::new(Duration::from_secs(10), 200).unwrap();
    let report = verifier.check(&server.key_url()).await;
    assert_eq!(report.status, Some(200));
    assert!(report.has_begin_marker);
    // The end marker sits past the cap, so it is never seen.
    assert!(!report.has_end_marker);
    assert!(!report.passed);
}
