use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::Value;

use super::{attach_blob, read_single_file, release_blob};
use crate::auth::RequireAdmin;
use crate::blob::UploadKind;
use crate::mapping::{EDUCATION_MAP, map_payload};
use crate::server::AppState;
use crate::server::dto::{
    CreateEducationRequest, EducationResponse, UpdateEducationRequest, parse_request,
};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::server::validation::{validate_current_end_date, validate_non_empty};
use crate::types::Education;

fn validate_education(edu: &Education) -> Result<(), ApiError> {
    validate_non_empty(&edu.institution, "institution_name")?;
    validate_non_empty(&edu.degree, "degree_title")?;
    validate_non_empty(&edu.start_date, "start_date")?;
    validate_current_end_date(edu.is_current, edu.end_date.as_deref())
}

pub async fn create_education(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &EDUCATION_MAP, true).map_err(ApiError::from)?;
    let req: CreateEducationRequest = parse_request(mapped)?;

    let edu = Education {
        id: 0,
        institution: req.institution,
        degree: req.degree,
        field_of_study: req.field_of_study,
        education_type: req.education_type,
        degree_level: req.degree_level,
        start_date: req.start_date,
        end_date: req.end_date,
        gpa: req.gpa,
        honors: req.honors,
        description: req.description,
        is_current: req.is_current,
        is_certification: req.is_certification,
        institution_logo: None,
        certificate: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    validate_education(&edu)?;

    let created = state.store.create_education(&edu)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(EducationResponse::from(created))),
    ))
}

pub async fn list_education(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let entries: Vec<EducationResponse> = state
        .store
        .list_education()?
        .into_iter()
        .map(EducationResponse::from)
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(entries)))
}

pub async fn get_education(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let edu = state
        .store
        .get_education(id)?
        .or_not_found("Education not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(EducationResponse::from(edu))))
}

pub async fn update_education(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &EDUCATION_MAP, false).map_err(ApiError::from)?;
    let req: UpdateEducationRequest = parse_request(mapped)?;

    let mut edu = state
        .store
        .get_education(id)?
        .or_not_found("Education not found")?;
    req.apply(&mut edu);
    validate_education(&edu)?;

    state.store.update_education(&edu)?;
    let updated = state
        .store
        .get_education(id)?
        .or_not_found("Education not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(EducationResponse::from(updated))))
}

pub async fn delete_education(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let blobs = state.store.delete_education(id)?;
    for key in &blobs {
        release_blob(&state, key).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn upload_logo(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> impl IntoResponse {
    let data = read_single_file(multipart).await?;

    attach_blob(&state, &data, UploadKind::Image, |blob| {
        state.store.set_institution_logo(id, Some(blob))
    })
    .await?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

pub async fn delete_logo(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let previous = state.store.set_institution_logo(id, None)?;
    if let Some(previous) = previous {
        release_blob(&state, &previous).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// Certificates may be an image or a PDF.
pub async fn upload_certificate(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> impl IntoResponse {
    let data = read_single_file(multipart).await?;

    attach_blob(&state, &data, UploadKind::ImageOrDocument, |blob| {
        state.store.set_certificate(id, Some(blob))
    })
    .await?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

pub async fn delete_certificate(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let previous = state.store.set_certificate(id, None)?;
    if let Some(previous) = previous {
        release_blob(&state, &previous).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
