use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::server::AppState;
use crate::server::dto::{
    EducationResponse, ExperienceResponse, PersonalInfoResponse, PortfolioResponse,
    ProjectResponse, SkillResponse,
};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};
use crate::types::{BlobRef, Project};

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(portfolio))
        .route("/projects", get(list_projects))
        .route("/projects/{id}", get(get_project))
        .route("/skills", get(list_skills))
        .route("/skills/categories", get(skill_categories))
        .route("/experience", get(list_experience))
        .route("/education", get(list_education))
        // Binary fetches
        .route("/images/profile", get(profile_image))
        .route("/images/skills/{id}", get(skill_icon))
        .route("/images/companies/{id}", get(company_logo))
        .route("/images/institutions/{id}", get(institution_logo))
        .route("/images/projects/{id}", get(project_image))
        .route("/documents/certificates/{id}", get(certificate))
}

fn shape_project(state: &AppState, project: Project) -> Result<ProjectResponse, ApiError> {
    let skills = state.store.list_project_skills(project.id)?;
    Ok(ProjectResponse::from_parts(project, skills))
}

/// Combined summary for a single-page portfolio render.
async fn portfolio(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let personal_info = state
        .store
        .get_personal_info()?
        .map(PersonalInfoResponse::from);

    let skills: Vec<SkillResponse> = state
        .store
        .list_skills()?
        .into_iter()
        .map(SkillResponse::from)
        .collect();

    let experience: Vec<ExperienceResponse> = state
        .store
        .list_experiences()?
        .into_iter()
        .map(ExperienceResponse::from)
        .collect();

    let education: Vec<EducationResponse> = state
        .store
        .list_education()?
        .into_iter()
        .map(EducationResponse::from)
        .collect();

    let featured_projects = state
        .store
        .list_featured_projects()?
        .into_iter()
        .map(|p| shape_project(&state, p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok::<_, ApiError>(Json(ApiResponse::success(PortfolioResponse {
        personal_info,
        skills,
        experience,
        education,
        featured_projects,
    })))
}

#[derive(Debug, Deserialize)]
struct ProjectFilter {
    category_id: Option<i64>,
    skill_id: Option<i64>,
    featured: Option<bool>,
    with_case_studies: Option<bool>,
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ProjectFilter>,
) -> impl IntoResponse {
    let projects = if let Some(category_id) = filter.category_id {
        state.store.list_projects_by_category(category_id)?
    } else if let Some(skill_id) = filter.skill_id {
        state.store.list_projects_by_skill(skill_id)?
    } else if filter.featured == Some(true) {
        state.store.list_featured_projects()?
    } else if filter.with_case_studies == Some(true) {
        state.store.list_projects_with_case_studies()?
    } else {
        state.store.list_projects()?
    };

    let shaped = projects
        .into_iter()
        .map(|p| shape_project(&state, p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok::<_, ApiError>(Json(ApiResponse::success(shaped)))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let project = state.store.get_project(id)?.or_not_found("Project not found")?;
    Ok::<_, ApiError>(Json(ApiResponse::success(shape_project(&state, project)?)))
}

#[derive(Debug, Deserialize)]
struct SkillFilter {
    category: Option<String>,
}

async fn list_skills(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SkillFilter>,
) -> impl IntoResponse {
    let skills = match filter.category.as_deref() {
        Some(category) => state.store.list_skills_by_category(category)?,
        None => state.store.list_skills()?,
    };

    let shaped: Vec<SkillResponse> = skills.into_iter().map(SkillResponse::from).collect();
    Ok::<_, ApiError>(Json(ApiResponse::success(shaped)))
}

async fn skill_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let categories = state.store.list_skill_categories()?;
    Ok::<_, ApiError>(Json(ApiResponse::success(categories)))
}

#[derive(Debug, Deserialize)]
struct ExperienceFilter {
    current_only: Option<bool>,
}

async fn list_experience(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ExperienceFilter>,
) -> impl IntoResponse {
    let experiences = if filter.current_only == Some(true) {
        state.store.list_current_experiences()?
    } else {
        state.store.list_experiences()?
    };

    let shaped: Vec<ExperienceResponse> = experiences
        .into_iter()
        .map(ExperienceResponse::from)
        .collect();
    Ok::<_, ApiError>(Json(ApiResponse::success(shaped)))
}

#[derive(Debug, Deserialize)]
struct EducationFilter {
    #[serde(rename = "type")]
    education_type: Option<String>,
    current_only: Option<bool>,
}

async fn list_education(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<EducationFilter>,
) -> impl IntoResponse {
    let entries = if filter.current_only == Some(true) {
        state.store.list_current_education()?
    } else {
        match filter.education_type.as_deref() {
            Some("degree") => state.store.list_degrees()?,
            Some("certification") => state.store.list_certifications()?,
            Some(other) => {
                return Err(ApiError::bad_request(format!(
                    "unknown education type '{other}'"
                )));
            }
            None => state.store.list_education()?,
        }
    };

    let shaped: Vec<EducationResponse> =
        entries.into_iter().map(EducationResponse::from).collect();
    Ok::<_, ApiError>(Json(ApiResponse::success(shaped)))
}

// ---- binary fetches ----

async fn serve_blob(state: &AppState, blob: Option<BlobRef>) -> Result<Response, ApiError> {
    let blob = blob.or_not_found("File not found")?;
    let data = state.blobs.get(&blob.key).await?;
    Ok(([(header::CONTENT_TYPE, blob.mime)], data).into_response())
}

async fn profile_image(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let info = state
        .store
        .get_personal_info()?
        .or_not_found("Personal info not found")?;
    serve_blob(&state, info.profile_image).await
}

async fn skill_icon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let skill = state.store.get_skill(id)?.or_not_found("Skill not found")?;
    serve_blob(&state, skill.icon).await
}

async fn company_logo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let exp = state
        .store
        .get_experience(id)?
        .or_not_found("Work experience not found")?;
    serve_blob(&state, exp.company_logo).await
}

async fn institution_logo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let edu = state
        .store
        .get_education(id)?
        .or_not_found("Education not found")?;
    serve_blob(&state, edu.institution_logo).await
}

async fn project_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let image = state.store.get_image(id)?.or_not_found("Image not found")?;
    serve_blob(&state, Some(image.image)).await
}

async fn certificate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let edu = state
        .store
        .get_education(id)?
        .or_not_found("Education not found")?;
    serve_blob(&state, edu.certificate).await
}
