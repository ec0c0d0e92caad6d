//! Prediction endpoint - upload an image, get a diagnosis

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;
use crate::uploads::{allowed_file, upload_name};

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub disease: String,
    pub confidence: f64,
    pub description: String,
    pub cause: String,
    pub treatment: String,
    /// URL the uploaded image is served from
    pub image_path: String,
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of the multipart body
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Option<Upload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        return Ok(Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

/// POST /predict - multipart field `file`
pub async fn predict(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> ApiResult<Json<PredictResponse>> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No file uploaded!".to_string()))?;

    if upload.filename.is_empty() {
        return Err(ApiError::BadRequest("No selected file!".to_string()));
    }

    if !allowed_file(&upload.filename) {
        return Err(ApiError::BadRequest(
            "Invalid file type. Please upload an image.".to_string(),
        ));
    }

    let filename = upload_name(&upload.filename, chrono::Utc::now().timestamp());
    let upload_dir = &state.config.upload_dir;
    let filepath = upload_dir.join(&filename);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save uploaded file: {}", e)))?;
    tokio::fs::write(&filepath, &upload.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save uploaded file: {}", e)))?;

    info!("Saved upload {} ({} bytes)", filename, upload.bytes.len());

    let Some(diagnoser) = state.diagnoser.clone() else {
        warn!("Prediction requested but no model is loaded");
        return Err(ApiError::Unavailable(
            "AI model not available. Please try again later.".to_string(),
        ));
    };

    // Preprocessing and the forward pass are CPU bound
    let diagnosis = tokio::task::spawn_blocking(move || diagnoser.diagnose(&filepath))
        .await
        .map_err(|e| ApiError::Internal(format!("Prediction failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Prediction failed: {}", e)))?;

    Ok(Json(PredictResponse {
        disease: diagnosis.label.to_string(),
        confidence: diagnosis.confidence,
        description: diagnosis.record.description.to_string(),
        cause: diagnosis.record.cause.to_string(),
        treatment: diagnosis.record.treatment.to_string(),
        image_path: format!("/uploads/{}", filename),
    }))
}
