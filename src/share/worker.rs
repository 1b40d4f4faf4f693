use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use super::registry::TransferRegistry;

/// Serve exactly one inbound connection with the file's bytes, then tear down.
///
/// Spawned as an independent task by the allocator, which hands over exclusive
/// ownership of the listener and the temp file. Whatever happens in between
/// (accept error, read error, the file vanishing underneath us), the registry
/// entry is released and the temp file removed before the task exits.
pub async fn serve_once(
    listener: TcpListener,
    code: u16,
    path: PathBuf,
    registry: Arc<TransferRegistry>,
    accept_timeout: Option<Duration>,
) {
    // Guards against the file being deleted between handoff and task start.
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        if let Err(e) = transfer(&listener, code, &path, accept_timeout).await {
            tracing::error!("transfer on port {} failed: {}", code, e);
        }
    } else {
        tracing::error!("file not found to serve: {}", path.display());
    }

    cleanup(code, &path, &registry).await;
    // dropping the listener here releases the port
}

async fn transfer(
    listener: &TcpListener,
    code: u16,
    path: &Path,
    accept_timeout: Option<Duration>,
) -> std::io::Result<()> {
    tracing::info!("serving '{}' on port {}", path.display(), code);

    let (mut stream, peer) = match accept_timeout {
        Some(limit) => match tokio::time::timeout(limit, listener.accept()).await {
            Ok(accepted) => accepted?,
            Err(_) => {
                tracing::warn!("no peer connected to port {} within {:?}", code, limit);
                return Ok(());
            }
        },
        None => listener.accept().await?,
    };
    tracing::info!("peer {} connected for download on port {}", peer, code);

    // Raw bytes until EOF; connecting is the whole protocol.
    let mut file = File::open(path).await?;
    let sent = tokio::io::copy(&mut file, &mut stream).await?;
    stream.shutdown().await?;

    tracing::info!("sent {} bytes on port {}", sent, code);
    Ok(())
}

/// Always-run terminal step: drop the registry entry, then best-effort delete.
async fn cleanup(code: u16, path: &Path, registry: &TransferRegistry) {
    registry.release(code);

    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::info!("cleaned up file and port {}", code),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        // No reaper for orphans; the leftover file is logged and kept.
        Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
    }
}
