pub mod handlers;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;

use crate::common::Config;
use crate::share::FileSharer;
use handlers::AppState;

/// Build the application state and serve HTTP until ctrl-c.
///
/// Transfer workers spawned by uploads are fire-and-forget; shutdown drops
/// them along with the runtime rather than waiting for their peers.
pub async fn start_server(config: Config) -> Result<()> {
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("create upload directory {}", config.upload_dir.display()))?;

    let sharer = Arc::new(FileSharer::new(config.share_config()));
    let state = AppState {
        sharer,
        config: Arc::new(config),
    };
    let app = routes::create_router(&state);

    let listener = TcpListener::bind(state.config.bind)
        .await
        .context("bind http listener")?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    Ok(())
}

async fn shutdown_signal() {
    signal::ctrl_c().await.ok();
    tracing::info!("shutting down");
}
