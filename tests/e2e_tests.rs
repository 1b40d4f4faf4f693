//! Full-stack round trip: real HTTP server, real multipart client, raw TCP fetch.

mod common;

use std::time::Duration;

use common::{test_app, wait_for};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

#[tokio::test]
async fn test_upload_then_fetch_over_tcp() {
    let dir = TempDir::new().unwrap();
    let (router, state) = test_app(&dir);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let content: Vec<u8> = (0..512 * 1024).map(|i| (i % 241) as u8).collect();
    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(content.clone()).file_name("blob.bin"),
    );

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/upload", addr))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.unwrap();
    let code = json["port"].as_u64().unwrap() as u16;

    // peer-side download: connect to the code's port, read raw bytes to EOF
    let mut stream = TcpStream::connect(("127.0.0.1", code)).await.unwrap();
    let mut received = Vec::new();
    stream.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, content);

    assert!(
        wait_for(|| state.sharer.lookup_path(code).is_none(), Duration::from_secs(5)).await,
        "code should be retired after the one-shot transfer"
    );
}
