//! Icon upload endpoint

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::Caller;
use crate::http::server::AppState;
use crate::upload::UploadError;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// POST /api/upload/icon - returns the served path as plain text
async fn upload_icon(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, ApiError> {
    let mut multipart = multipart.map_err(|e| UploadError::Multipart(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or(UploadError::MissingFile)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.body_text()))?;

        let public_path = state.icons.save(&original_name, &data).await?;
        return Ok(public_path);
    }

    Err(UploadError::MissingFile.into())
}

/// Upload routes, with the body limit applied to the upload route only
pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/upload/icon",
        post(upload_icon).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
