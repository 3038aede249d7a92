//! HTTP stream source tests
//!
//! Each test runs a one-shot TCP server that answers with a canned HTTP
//! response, so no external network access is needed.

use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::*;
use crate::{KeywordFilter, RecordStream, SourceError, StreamSource};

/// Start a server that answers one request with `response`, then keeps the
/// socket open for `linger` before closing it.
///
/// Returns the URL to connect to and a receiver for the raw request head.
async fn serve_once(
    response: &'static [u8],
    linger: Duration,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let _ = tx.send(String::from_utf8_lossy(&head).into_owned());

        socket.write_all(response).await.unwrap();
        tokio::time::sleep(linger).await;
        let _ = socket.shutdown().await;
    });

    (format!("http://{}/stream", addr), rx)
}

fn source_for(url: String) -> HttpStreamSource {
    let config = HttpStreamConfig::new(url)
        .with_connect_timeout(Duration::from_secs(5))
        .with_stall_timeout(Duration::from_secs(5));
    HttpStreamSource::new(config).unwrap()
}

#[tokio::test]
async fn test_records_decoded_and_keepalives_skipped() {
    let (url, _head) = serve_once(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n\
          {\"id\":1}\r\n\r\n{\"id\":2,\"text\":\"hi\"}\n",
        Duration::ZERO,
    )
    .await;

    let mut source = source_for(url);
    let mut stream = source.connect(None).await.unwrap();

    let first = stream.next_record().await.unwrap().unwrap();
    assert_eq!(first.value(), &json!({"id": 1}));

    let second = stream.next_record().await.unwrap().unwrap();
    assert_eq!(second.value(), &json!({"id": 2, "text": "hi"}));

    assert!(stream.next_record().await.unwrap().is_none());
    assert_eq!(stream.keepalives(), 1);
}

#[tokio::test]
async fn test_bearer_token_and_track_param_sent() {
    let (url, head) = serve_once(
        b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n",
        Duration::ZERO,
    )
    .await;

    let config = HttpStreamConfig::new(url).with_bearer_token("secret");
    let mut source = HttpStreamSource::new(config).unwrap();
    let filter = KeywordFilter::from_terms(["beta", "alpha"]).unwrap();

    let mut stream = source.connect(Some(&filter)).await.unwrap();
    assert!(stream.next_record().await.unwrap().is_none());

    let head = head.await.unwrap().to_lowercase();
    assert!(head.contains("authorization: bearer secret"), "{}", head);
    assert!(head.contains("track=alpha%2cbeta"), "{}", head);
    assert!(head.contains("user-agent: spool/"), "{}", head);
}

#[tokio::test]
async fn test_non_success_status() {
    let (url, _head) = serve_once(
        b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 12\r\nConnection: close\r\n\r\nunauthorized",
        Duration::ZERO,
    )
    .await;

    let mut source = source_for(url);
    let err = source.connect(None).await.err().unwrap();

    assert!(matches!(err, SourceError::Status { status: 401, .. }));
    assert!(err.is_auth_failure());
    assert!(err.is_transient());
    assert!(err.to_string().contains("unauthorized"));
}

#[tokio::test]
async fn test_invalid_json_is_framing_error() {
    let (url, _head) = serve_once(
        b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nnot json\n",
        Duration::ZERO,
    )
    .await;

    let mut source = source_for(url);
    let mut stream = source.connect(None).await.unwrap();
    let err = stream.next_record().await.unwrap_err();

    assert!(matches!(err, SourceError::Framing(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_stall_detected() {
    let (url, _head) = serve_once(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n9\r\n{\"id\":1}\n\r\n",
        Duration::from_secs(10),
    )
    .await;

    let config = HttpStreamConfig::new(url).with_stall_timeout(Duration::from_millis(200));
    let mut source = HttpStreamSource::new(config).unwrap();
    let mut stream = source.connect(None).await.unwrap();

    assert!(stream.next_record().await.unwrap().is_some());

    let err = stream.next_record().await.unwrap_err();
    assert!(matches!(err, SourceError::Stalled { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut source = source_for(format!("http://{}/stream", addr));
    let err = source.connect(None).await.err().unwrap();

    assert!(matches!(err, SourceError::Request(_)));
    assert!(err.is_transient());
}
