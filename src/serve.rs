//! HTTP front for the badge composite plus static file serving.
//!
//! `POST /upload` takes a multipart form with a `photo` field, runs the
//! circular composite against the template in the public directory, and
//! answers `{"image": "data:image/jpeg;base64,…"}`. Any failure along the
//! way is a 500 with a generic body. Everything else is served from the
//! public directory.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use base64::Engine as _;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::badge::{compose_badge, encode_jpeg};

/// Default port, overridable via `PORT` or `--port`.
pub const DEFAULT_PORT: u16 = 3000;
/// Template filename inside the public directory.
pub const TEMPLATE_FILENAME: &str = "event.jpg";

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub public_dir: PathBuf,
}

#[derive(serde::Serialize)]
struct UploadResponse {
    image: String,
}

pub fn router(config: ServeConfig) -> Router {
    let public_dir = config.public_dir.clone();
    Router::new()
        .route("/upload", post(upload))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config))
}

async fn upload(State(config): State<Arc<ServeConfig>>, multipart: Multipart) -> Response {
    match process_upload(&config, multipart).await {
        Ok(data_url) => Json(UploadResponse { image: data_url }).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "upload processing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Processing error").into_response()
        }
    }
}

async fn process_upload(
    config: &ServeConfig,
    mut multipart: Multipart,
) -> anyhow::Result<String> {
    let mut photo: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("photo") {
            photo = Some(field.bytes().await?.to_vec());
            break;
        }
    }
    let photo = photo.ok_or_else(|| anyhow::anyhow!("missing 'photo' field"))?;

    // The template is read per request, like the background re-load at
    // export time: on-disk changes take effect without a restart.
    let template_path = config.public_dir.join(TEMPLATE_FILENAME);
    let template = tokio::fs::read(&template_path).await?;

    let composed = compose_badge(&template, &photo)?;
    let jpeg = encode_jpeg(&composed)?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(&jpeg);
    Ok(format!("data:image/jpeg;base64,{b64}"))
}
