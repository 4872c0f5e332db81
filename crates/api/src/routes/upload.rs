//! Product image upload.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use datastore::Datastore;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

/// POST /upload — multipart file upload into the blob store.
///
/// Stored under `products/{random}-{filename}` so repeated uploads of
/// the same file never collide.
#[tracing::instrument(skip(state, multipart))]
pub async fn create<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;

        let pathname = format!("products/{}-{filename}", Uuid::new_v4().simple());
        let blob = state
            .blobs
            .put(&pathname, &content_type, bytes.to_vec())
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        tracing::info!(pathname = %blob.pathname, "file uploaded");
        return Ok(Json(serde_json::json!({
            "success": true,
            "url": blob.url,
            "pathname": blob.pathname,
        })));
    }

    Err(ApiError::BadRequest("No file provided".to_string()))
}
