use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use super::{attach_blob, read_single_file, release_blob};
use crate::auth::RequireAdmin;
use crate::blob::UploadKind;
use crate::mapping::{PERSONAL_INFO_MAP, map_payload};
use crate::server::AppState;
use crate::server::dto::{PersonalInfoPayload, PersonalInfoResponse, parse_request};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};

pub async fn get_personal_info(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let info = state
        .store
        .get_personal_info()?
        .or_not_found("Personal info not set")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(PersonalInfoResponse::from(info))))
}

/// Create-or-update: the singleton record is created on first write, even
/// from a partial payload, and patched thereafter.
pub async fn put_personal_info(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &PERSONAL_INFO_MAP, false).map_err(ApiError::from)?;
    let req: PersonalInfoPayload = parse_request(mapped)?;

    let info = match state.store.get_personal_info()? {
        Some(mut existing) => {
            req.apply(&mut existing);
            state.store.update_personal_info(&existing)?;
            state
                .store
                .get_personal_info()?
                .or_not_found("Personal info not set")?
        }
        None => state.store.create_personal_info(&req.into_new())?,
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(PersonalInfoResponse::from(info))))
}

pub async fn upload_profile_image(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    let data = read_single_file(multipart).await?;

    // A profile image may arrive before the record itself exists.
    if state.store.get_personal_info()?.is_none() {
        state
            .store
            .create_personal_info(&PersonalInfoPayload::default_record())?;
    }

    attach_blob(&state, &data, UploadKind::Image, |blob| {
        state.store.set_profile_image(Some(blob))
    })
    .await?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

pub async fn delete_profile_image(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let previous = state.store.set_profile_image(None)?;
    if let Some(previous) = previous {
        release_blob(&state, &previous).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
