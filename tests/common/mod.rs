#![allow(dead_code)] // each test binary uses a different subset of helpers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use portdrop::common::Config;
use portdrop::server::handlers::AppState;
use portdrop::server::routes;
use portdrop::share::FileSharer;
use tempfile::TempDir;

/// Config pointing at a throwaway upload directory.
pub fn test_config(upload_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.upload_dir = upload_dir.path().to_path_buf();
    config
}

pub fn test_app(upload_dir: &TempDir) -> (Router, AppState) {
    let config = test_config(upload_dir);
    let state = AppState {
        sharer: Arc::new(FileSharer::new(config.share_config())),
        config: Arc::new(config),
    };
    let router = routes::create_router(&state);
    (router, state)
}

pub fn write_temp_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Poll until `predicate` holds or the deadline passes.
pub async fn wait_for<F: Fn() -> bool>(predicate: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    predicate()
}
