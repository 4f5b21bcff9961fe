use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::Value;

use super::release_blob;
use crate::auth::RequireAdmin;
use crate::mapping::{PROJECT_MAP, map_payload};
use crate::server::AppState;
use crate::server::dto::{
    AssignSkillRequest, BulkFeaturedRequest, CreateCategoryRequest, CreateProjectRequest,
    ProjectResponse, ProjectSkillEntry, ReplaceSkillsRequest, UpdateCategoryRequest,
    UpdateProjectRequest, parse_request,
};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::server::validation::{validate_non_empty, validate_range};
use crate::types::{Project, ProjectCategory, ProjectSkill};

fn validate_project(project: &Project) -> Result<(), ApiError> {
    validate_non_empty(&project.title, "name")?;
    validate_non_empty(&project.description, "description")?;
    validate_range(project.difficulty_level, 1, 5, "difficulty_level")
}

fn shape_project(state: &AppState, project: Project) -> Result<ProjectResponse, ApiError> {
    let skills = state.store.list_project_skills(project.id)?;
    Ok(ProjectResponse::from_parts(project, skills))
}

fn shape_projects(
    state: &AppState,
    projects: Vec<Project>,
) -> Result<Json<ApiResponse<Vec<ProjectResponse>>>, ApiError> {
    let shaped = projects
        .into_iter()
        .map(|p| shape_project(state, p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ApiResponse::success(shaped)))
}

// ---- categories ----

pub async fn create_category(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    validate_non_empty(&req.name, "name")?;

    let category = ProjectCategory {
        id: 0,
        name: req.name,
        description: req.description,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.store.create_category(&category)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn list_categories(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let categories = state.store.list_categories()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(categories)))
}

pub async fn get_category(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let category = state
        .store
        .get_category(id)?
        .or_not_found("Category not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(category)))
}

pub async fn update_category(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    let mut category = state
        .store
        .get_category(id)?
        .or_not_found("Category not found")?;
    req.apply(&mut category);
    validate_non_empty(&category.name, "name")?;

    state.store.update_category(&category)?;
    let updated = state
        .store
        .get_category(id)?
        .or_not_found("Category not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(updated)))
}

pub async fn delete_category(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    // Projects keep existing with a cleared category (FK SET NULL).
    if !state.store.delete_category(id)? {
        return Err(ApiError::not_found("Category not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

// ---- projects ----

pub async fn create_project(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &PROJECT_MAP, true).map_err(ApiError::from)?;
    let req: CreateProjectRequest = parse_request(mapped)?;

    if let Some(category_id) = req.category_id {
        state
            .store
            .get_category(category_id)?
            .or_not_found("Category not found")?;
    }

    let project = Project {
        id: 0,
        title: req.title,
        description: req.description,
        detailed_description: req.detailed_description,
        technologies: req.technologies,
        category_id: req.category_id,
        difficulty_level: req.difficulty_level,
        status: req.status,
        is_deployed: req.is_deployed,
        live_url: req.live_url,
        github_url: req.github_url,
        client_name: req.client_name,
        start_date: req.start_date,
        end_date: req.end_date,
        featured: req.featured,
        problem_statement: req.problem_statement,
        solution_approach: req.solution_approach,
        key_challenges: req.key_challenges,
        lessons_learned: req.lessons_learned,
        results_achieved: req.results_achieved,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    validate_project(&project)?;

    // Scalars first, then the association list.
    let created = state.store.create_project(&project)?;
    if let Some(skill_ids) = req.skill_ids {
        state.store.replace_project_skills(created.id, &skill_ids)?;
    }

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(shape_project(&state, created)?)),
    ))
}

pub async fn list_projects(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    shape_projects(&state, state.store.list_projects()?)
}

pub async fn list_featured(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    shape_projects(&state, state.store.list_featured_projects()?)
}

pub async fn list_case_studies(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    shape_projects(&state, state.store.list_projects_with_case_studies()?)
}

pub async fn list_by_category(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    shape_projects(&state, state.store.list_projects_by_category(id)?)
}

pub async fn list_by_skill(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    shape_projects(&state, state.store.list_projects_by_skill(id)?)
}

pub async fn get_project(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let project = state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(shape_project(&state, project)?)))
}

pub async fn update_project(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let mapped = map_payload(payload, &PROJECT_MAP, false).map_err(ApiError::from)?;
    let req: UpdateProjectRequest = parse_request(mapped)?;

    let mut project = state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;

    if let Some(category_id) = req.category_id {
        state
            .store
            .get_category(category_id)?
            .or_not_found("Category not found")?;
    }

    let skill_ids = req.skill_ids.clone();
    req.apply(&mut project);
    validate_project(&project)?;

    state.store.update_project(&project)?;
    if let Some(skill_ids) = skill_ids {
        state.store.replace_project_skills(id, &skill_ids)?;
    }

    let updated = state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(shape_project(&state, updated)?)))
}

pub async fn delete_project(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let blobs = state
        .store
        .delete_project(id)?
        .or_not_found("Project not found")?;

    for key in &blobs {
        release_blob(&state, key).await;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// Full replace of the featured set.
pub async fn bulk_set_featured(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkFeaturedRequest>,
) -> impl IntoResponse {
    state.store.set_featured_projects(&req.project_ids)?;
    shape_projects(&state, state.store.list_featured_projects()?)
}

// ---- skill associations ----

pub async fn list_project_skills(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;

    let entries: Vec<ProjectSkillEntry> = state
        .store
        .list_project_skills(id)?
        .into_iter()
        .map(|(skill, relevance_score)| ProjectSkillEntry {
            id: skill.id,
            name: skill.name,
            category: skill.category,
            proficiency: skill.proficiency,
            relevance_score,
        })
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(entries)))
}

/// Upserts a single (project, skill) pair with its relevance.
pub async fn assign_skill(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AssignSkillRequest>,
) -> impl IntoResponse {
    validate_range(req.relevance_score, 1, 10, "relevance_score")?;

    state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;
    state
        .store
        .get_skill(req.skill_id)?
        .or_not_found("Skill not found")?;

    state.store.upsert_project_skill(&ProjectSkill {
        project_id: id,
        skill_id: req.skill_id,
        relevance_score: req.relevance_score,
    })?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(()))))
}

/// Replace-all association update. Unknown skill ids are skipped.
pub async fn replace_skills(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ReplaceSkillsRequest>,
) -> impl IntoResponse {
    state
        .store
        .get_project(id)?
        .or_not_found("Project not found")?;

    state.store.replace_project_skills(id, &req.skill_ids)?;

    let ids = state.store.list_project_skill_ids(id)?;
    Ok::<_, ApiError>(Json(ApiResponse::success(ids)))
}
