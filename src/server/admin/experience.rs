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
use crate::mapping::{EXPERIENCE_MAP, map_payload};
use crate::server::AppState;
use crate::server::dto::{
    CreateExperienceRequest, ExperienceResponse, UpdateExperienceRequest, parse_request,
};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::server::validation::{validate_current_end_date, validate_non_empty};
use crate::types::WorkExperience;

fn validate_experience(exp: &WorkExperience) -> Result<(), ApiError> {
    validate_non_empty(&exp.company, "company")?;
    validate_non_empty(&exp.position, "job_title")?;
    validate_non_empty(&exp.start_date, "start_date")?;
    validate_current_end_date(exp.is_current, exp.end_date.as_deref())
}

pub async fn create_experience(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &EXPERIENCE_MAP, true).map_err(ApiError::from)?;
    let req: CreateExperienceRequest = parse_request(mapped)?;

    let exp = WorkExperience {
        id: 0,
        company: req.company,
        position: req.position,
        start_date: req.start_date,
        end_date: req.end_date,
        description: req.description,
        achievements: req.achievements,
        location: req.location,
        is_current: req.is_current,
        company_logo: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    validate_experience(&exp)?;

    let created = state.store.create_experience(&exp)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(ExperienceResponse::from(created))),
    ))
}

pub async fn list_experience(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let experiences: Vec<ExperienceResponse> = state
        .store
        .list_experiences()?
        .into_iter()
        .map(ExperienceResponse::from)
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(experiences)))
}

pub async fn get_experience(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let exp = state
        .store
        .get_experience(id)?
        .or_not_found("Work experience not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(ExperienceResponse::from(exp))))
}

pub async fn update_experience(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &EXPERIENCE_MAP, false).map_err(ApiError::from)?;
    let req: UpdateExperienceRequest = parse_request(mapped)?;

    let mut exp = state
        .store
        .get_experience(id)?
        .or_not_found("Work experience not found")?;
    req.apply(&mut exp);
    validate_experience(&exp)?;

    state.store.update_experience(&exp)?;
    let updated = state
        .store
        .get_experience(id)?
        .or_not_found("Work experience not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(ExperienceResponse::from(updated))))
}

pub async fn delete_experience(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let logo = state.store.delete_experience(id)?;
    if let Some(logo) = logo {
        release_blob(&state, &logo).await;
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
        state.store.set_company_logo(id, Some(blob))
    })
    .await?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

pub async fn delete_logo(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let previous = state.store.set_company_logo(id, None)?;
    if let Some(previous) = previous {
        release_blob(&state, &previous).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
