mod education;
mod experience;
mod images;
mod personal_info;
mod projects;
mod skills;

use std::sync::Arc;

use axum::{
    Router,
    extract::Multipart,
    routing::{delete, get, post, put},
};

use crate::blob::{UploadKind, validate_upload};
use crate::server::AppState;
use crate::server::response::ApiError;
use crate::types::BlobRef;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // Personal info (singleton)
        .route("/personal-info", get(personal_info::get_personal_info))
        .route("/personal-info", put(personal_info::put_personal_info))
        .route("/personal-info/image", post(personal_info::upload_profile_image))
        .route("/personal-info/image", delete(personal_info::delete_profile_image))
        // Skill routes
        .route("/skills", post(skills::create_skill))
        .route("/skills", get(skills::list_skills))
        .route("/skills/{id}", get(skills::get_skill))
        .route("/skills/{id}", put(skills::update_skill))
        .route("/skills/{id}", delete(skills::delete_skill))
        .route("/skills/{id}/icon", post(skills::upload_icon))
        .route("/skills/{id}/icon", delete(skills::delete_icon))
        // Work experience routes
        .route("/experience", post(experience::create_experience))
        .route("/experience", get(experience::list_experience))
        .route("/experience/{id}", get(experience::get_experience))
        .route("/experience/{id}", put(experience::update_experience))
        .route("/experience/{id}", delete(experience::delete_experience))
        .route("/experience/{id}/logo", post(experience::upload_logo))
        .route("/experience/{id}/logo", delete(experience::delete_logo))
        // Education routes
        .route("/education", post(education::create_education))
        .route("/education", get(education::list_education))
        .route("/education/{id}", get(education::get_education))
        .route("/education/{id}", put(education::update_education))
        .route("/education/{id}", delete(education::delete_education))
        .route("/education/{id}/logo", post(education::upload_logo))
        .route("/education/{id}/logo", delete(education::delete_logo))
        .route("/education/{id}/certificate", post(education::upload_certificate))
        .route("/education/{id}/certificate", delete(education::delete_certificate))
        // Category routes
        .route("/categories", post(projects::create_category))
        .route("/categories", get(projects::list_categories))
        .route("/categories/{id}", get(projects::get_category))
        .route("/categories/{id}", put(projects::update_category))
        .route("/categories/{id}", delete(projects::delete_category))
        // Project routes
        .route("/projects", post(projects::create_project))
        .route("/projects", get(projects::list_projects))
        .route("/projects/featured", get(projects::list_featured))
        .route("/projects/case-studies", get(projects::list_case_studies))
        .route("/projects/category/{id}", get(projects::list_by_category))
        .route("/projects/skill/{id}", get(projects::list_by_skill))
        .route("/projects/bulk/featured", put(projects::bulk_set_featured))
        .route("/projects/{id}", get(projects::get_project))
        .route("/projects/{id}", put(projects::update_project))
        .route("/projects/{id}", delete(projects::delete_project))
        // Project-skill association routes
        .route("/projects/{id}/skills", get(projects::list_project_skills))
        .route("/projects/{id}/skills", post(projects::assign_skill))
        .route("/projects/{id}/skills", put(projects::replace_skills))
        // Project image routes
        .route("/projects/{id}/images", get(images::list_images))
        .route("/projects/{id}/images", post(images::upload_images))
        .route("/projects/images/{id}/main", put(images::set_main))
        .route("/projects/images/{id}/caption", put(images::set_caption))
        .route("/projects/images/{id}", delete(images::delete_image))
}

/// Reads the single `file` part of a multipart upload.
pub(super) async fn read_single_file(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read file: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::bad_request("missing 'file' field"))
}

/// Validates and stores a blob, then attaches it to an entity through the
/// given store setter. The freshly written blob is rolled back if the setter
/// fails, and the replaced blob (if any) is released afterwards.
pub(super) async fn attach_blob<F>(
    state: &AppState,
    data: &[u8],
    kind: UploadKind,
    set: F,
) -> Result<(), ApiError>
where
    F: FnOnce(&BlobRef) -> crate::error::Result<Option<String>>,
{
    let mime = validate_upload(&state.config, kind, data)?;
    let key = state.blobs.put(data).await?;
    let blob = BlobRef {
        key: key.clone(),
        mime: mime.to_string(),
    };

    let previous = match set(&blob) {
        Ok(previous) => previous,
        Err(e) => {
            release_blob(state, &key).await;
            return Err(e.into());
        }
    };

    if let Some(previous) = previous {
        release_blob(state, &previous).await;
    }
    Ok(())
}

/// Best-effort blob removal; a leftover file is logged, never surfaced.
pub(super) async fn release_blob(state: &AppState, key: &str) {
    if let Err(e) = state.blobs.delete(key).await {
        tracing::warn!("failed to delete blob {}: {}", key, e);
    }
}
