use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use super::release_blob;
use crate::auth::RequireAdmin;
use crate::blob::{UploadKind, validate_upload};
use crate::server::AppState;
use crate::server::dto::{CaptionRequest, ProjectImageResponse, UploadFailure, UploadReport};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::{BlobRef, ProjectImage};

pub async fn list_images(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;

    let images: Vec<ProjectImageResponse> = state
        .store
        .list_project_images(id)?
        .into_iter()
        .map(ProjectImageResponse::from)
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(images)))
}

/// Multipart batch upload: repeated `files` parts, an optional `captions`
/// part holding a JSON string array zipped by position, and an optional
/// `main_index` part. Files are processed independently; one bad file does
/// not sink the batch, and the response reports each outcome.
pub async fn upload_images(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    state
        .store
        .get_project(project_id)?
        .or_not_found("Project not found")?;

    let mut files: Vec<(Option<String>, Vec<u8>)> = Vec::new();
    let mut captions_raw: Option<String> = None;
    let mut main_index_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("files") | Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read file: {e}")))?;
                files.push((filename, bytes.to_vec()));
            }
            Some("captions") => {
                captions_raw = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("failed to read captions: {e}"))
                })?);
            }
            Some("main_index") => {
                main_index_raw = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("failed to read main_index: {e}"))
                })?);
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("no files provided"));
    }

    let captions: Vec<String> = match captions_raw {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| ApiError::bad_request(format!("captions must be a JSON string array: {e}")))?,
        None => Vec::new(),
    };

    let mut main_index: usize = match main_index_raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::bad_request("main_index must be a non-negative integer"))?,
        None => 0,
    };
    // An out-of-range designation falls back to the first file.
    if main_index >= files.len() {
        main_index = 0;
    }

    let mut uploaded: Vec<(usize, ProjectImage)> = Vec::new();
    let mut failed = Vec::new();
    for (index, (filename, data)) in files.into_iter().enumerate() {
        let caption = captions.get(index).cloned();
        match store_one(&state, project_id, &data, caption).await {
            Ok(image) => uploaded.push((index, image)),
            Err(e) => failed.push(UploadFailure {
                index,
                filename,
                error: e.message,
            }),
        }
    }

    if uploaded.is_empty() {
        // Nothing was stored, so the project's existing main is untouched.
        let first = failed
            .first()
            .map(|f| f.error.clone())
            .unwrap_or_else(|| "upload failed".to_string());
        return Err(ApiError::bad_request(format!("all uploads failed: {first}")));
    }

    // The designated main displaces any existing main, applied only once its
    // row exists. When the designated file failed, the first stored file
    // stands in.
    let main_pos = uploaded
        .iter()
        .position(|(index, _)| *index == main_index)
        .unwrap_or(0);
    state.store.set_main_image(uploaded[main_pos].1.id)?;

    let uploaded: Vec<ProjectImageResponse> = uploaded
        .into_iter()
        .enumerate()
        .map(|(pos, (_, mut image))| {
            image.is_main = pos == main_pos;
            ProjectImageResponse::from(image)
        })
        .collect();

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(UploadReport { uploaded, failed })),
    ))
}

/// Blob write and row insert succeed or fail together; a row failure rolls
/// the blob back so no orphan is left behind.
async fn store_one(
    state: &AppState,
    project_id: i64,
    data: &[u8],
    caption: Option<String>,
) -> Result<ProjectImage, ApiError> {
    let mime = validate_upload(&state.config, UploadKind::Image, data)?;
    let key = state.blobs.put(data).await?;

    let image = ProjectImage {
        id: 0,
        project_id,
        caption,
        is_main: false,
        image: BlobRef {
            key: key.clone(),
            mime: mime.to_string(),
        },
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    match state.store.create_image(&image) {
        Ok(created) => Ok(created),
        Err(e) => {
            release_blob(state, &key).await;
            Err(e.into())
        }
    }
}

pub async fn set_main(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.store.set_main_image(id)?;

    let image = state.store.get_image(id)?.or_not_found("Image not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(ProjectImageResponse::from(image))))
}

pub async fn set_caption(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CaptionRequest>,
) -> impl IntoResponse {
    state.store.update_image_caption(id, &req.caption)?;

    let image = state.store.get_image(id)?.or_not_found("Image not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(ProjectImageResponse::from(image))))
}

pub async fn delete_image(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let blob = state
        .store
        .delete_image(id)?
        .or_not_found("Image not found")?;
    release_blob(&state, &blob).await;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
