//! HTTP handlers for upload and direct download.

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::header,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::common::{AppError, Config};
use crate::share::FileSharer;
use crate::utils::security;

/// Application state passed to all handlers via the Axum State extractor.
#[derive(Clone)]
pub struct AppState {
    pub sharer: Arc<FileSharer>,
    pub config: Arc<Config>,
}

/// Store the uploaded file and hand back its transfer code.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        security::validate_filename(&original_name)
            .map_err(|e| AppError::BadRequest(format!("invalid filename: {}", e)))?;

        // Unique prefix keeps concurrent uploads apart; the original name is
        // kept after the underscore so download can recover it.
        let stored_name = format!("{}_{}", Uuid::new_v4(), original_name);
        let path = state.config.upload_dir.join(stored_name);

        // Stream the field to disk chunk by chunk, never buffering the body
        let mut file = File::create(&path).await.context("create upload file")?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            file.write_all(&chunk).await.context("write upload chunk")?;
        }
        file.flush().await.context("flush upload file")?;
        drop(file);

        let code = match state.sharer.offer_file(path.clone()).await {
            Ok(code) => code,
            Err(e) => {
                // nothing will ever serve this file, don't leave it behind
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e.into());
            }
        };

        return Ok(Json(json!({ "port": code })));
    }

    Err(AppError::BadRequest(
        "missing 'file' field in multipart body".to_string(),
    ))
}

/// Stream a stored file for a still-active code. Does not consume the code;
/// the TCP path does its own teardown when a peer connects there instead.
pub async fn download_handler(
    Path(code): Path<u16>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let file_path = state
        .sharer
        .lookup_path(code)
        .ok_or_else(|| AppError::NotFound(format!("no active transfer for code {}", code)))?;

    let file = File::open(&file_path).await.context("open stored file")?;
    let size = file.metadata().await.context("stat stored file")?.len();

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", display_name(&file_path)),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .context("build response")?)
}

/// Stored names are `<uuid>_<original>`; show the original to the client.
fn display_name(path: &std::path::Path) -> String {
    let stored = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");

    match stored.split_once('_') {
        Some((_, original)) if !original.is_empty() => original.to_string(),
        _ => stored.to_string(),
    }
}
