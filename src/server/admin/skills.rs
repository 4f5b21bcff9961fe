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
use crate::mapping::{SKILL_MAP, map_payload};
use crate::server::AppState;
use crate::server::dto::{CreateSkillRequest, SkillResponse, UpdateSkillRequest, parse_request};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::server::validation::{validate_non_empty, validate_non_negative, validate_range};
use crate::types::Skill;

fn validate_skill(skill: &Skill) -> Result<(), ApiError> {
    validate_non_empty(&skill.name, "name")?;
    validate_non_empty(&skill.category, "category")?;
    validate_range(skill.proficiency, 1, 5, "proficiency")?;
    validate_non_negative(skill.years_experience, "years_experience")
}

pub async fn create_skill(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &SKILL_MAP, true).map_err(ApiError::from)?;
    let req: CreateSkillRequest = parse_request(mapped)?;

    let skill = Skill {
        id: 0,
        name: req.name,
        category: req.category,
        proficiency: req.proficiency,
        years_experience: req.years_experience,
        icon: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    validate_skill(&skill)?;

    let created = state.store.create_skill(&skill)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(SkillResponse::from(created))),
    ))
}

pub async fn list_skills(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let skills: Vec<SkillResponse> = state
        .store
        .list_skills()?
        .into_iter()
        .map(SkillResponse::from)
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(skills)))
}

pub async fn get_skill(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let skill = state.store.get_skill(id)?.or_not_found("Skill not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(SkillResponse::from(skill))))
}

pub async fn update_skill(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &SKILL_MAP, false).map_err(ApiError::from)?;
    let req: UpdateSkillRequest = parse_request(mapped)?;

    let mut skill = state.store.get_skill(id)?.or_not_found("Skill not found")?;
    req.apply(&mut skill);
    validate_skill(&skill)?;

    state.store.update_skill(&skill)?;
    let updated = state.store.get_skill(id)?.or_not_found("Skill not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(SkillResponse::from(updated))))
}

pub async fn delete_skill(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let icon = state.store.delete_skill(id)?;
    if let Some(icon) = icon {
        release_blob(&state, &icon).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn upload_icon(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> impl IntoResponse {
    let data = read_single_file(multipart).await?;

    attach_blob(&state, &data, UploadKind::Image, |blob| {
        state.store.set_skill_icon(id, Some(blob))
    })
    .await?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

pub async fn delete_icon(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let previous = state.store.set_skill_icon(id, None)?;
    if let Some(previous) = previous {
        release_blob(&state, &previous).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
