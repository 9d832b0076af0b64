// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image upload route for the note editor.

use crate::error::Result;
use crate::middleware::SessionUser;
use crate::services::uploads::MAX_IMAGE_BYTES;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/uploads",
        // Leave room above the image limit so oversized files get a readable error.
        post(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES * 2)),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "image".to_string()
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Upload the raw request body as an image.
async fn upload_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<UploadResponse>> {
    let url = state
        .uploader
        .upload(Some(user.uid()), &params.file_name, body.to_vec())
        .await?;

    tracing::info!(uid = %user.uid(), file = %params.file_name, "Image uploaded");
    Ok(Json(UploadResponse { url }))
}
