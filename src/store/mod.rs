mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Update operations take the full row; partial-update merging happens in
/// the handlers before the row is written back. Operations that release a
/// blob return the previous blob key so the caller can delete it from the
/// blob store.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Personal info (singleton)
    fn get_personal_info(&self) -> Result<Option<PersonalInfo>>;
    /// Fails with SingletonViolation when a record already exists. The check
    /// and insert run inside one transaction.
    fn create_personal_info(&self, info: &PersonalInfo) -> Result<PersonalInfo>;
    fn update_personal_info(&self, info: &PersonalInfo) -> Result<()>;
    /// Returns the previous blob key, if any.
    fn set_profile_image(&self, image: Option<&BlobRef>) -> Result<Option<String>>;

    // Skill operations
    fn create_skill(&self, skill: &Skill) -> Result<Skill>;
    fn get_skill(&self, id: i64) -> Result<Option<Skill>>;
    fn list_skills(&self) -> Result<Vec<Skill>>;
    fn list_skills_by_category(&self, category: &str) -> Result<Vec<Skill>>;
    fn list_skill_categories(&self) -> Result<Vec<String>>;
    fn update_skill(&self, skill: &Skill) -> Result<()>;
    /// Deleting a skill also removes its project associations (FK cascade).
    fn delete_skill(&self, id: i64) -> Result<Option<String>>;
    fn set_skill_icon(&self, id: i64, icon: Option<&BlobRef>) -> Result<Option<String>>;

    // Work experience operations
    fn create_experience(&self, exp: &WorkExperience) -> Result<WorkExperience>;
    fn get_experience(&self, id: i64) -> Result<Option<WorkExperience>>;
    /// Ordered by start_date descending (newest first).
    fn list_experiences(&self) -> Result<Vec<WorkExperience>>;
    fn list_current_experiences(&self) -> Result<Vec<WorkExperience>>;
    fn update_experience(&self, exp: &WorkExperience) -> Result<()>;
    fn delete_experience(&self, id: i64) -> Result<Option<String>>;
    fn set_company_logo(&self, id: i64, logo: Option<&BlobRef>) -> Result<Option<String>>;

    // Education operations
    fn create_education(&self, edu: &Education) -> Result<Education>;
    fn get_education(&self, id: i64) -> Result<Option<Education>>;
    /// Ordered by end_date descending with NULL (current) first.
    fn list_education(&self) -> Result<Vec<Education>>;
    fn list_degrees(&self) -> Result<Vec<Education>>;
    fn list_certifications(&self) -> Result<Vec<Education>>;
    fn list_current_education(&self) -> Result<Vec<Education>>;
    fn update_education(&self, edu: &Education) -> Result<()>;
    fn delete_education(&self, id: i64) -> Result<Vec<String>>;
    fn set_institution_logo(&self, id: i64, logo: Option<&BlobRef>) -> Result<Option<String>>;
    fn set_certificate(&self, id: i64, cert: Option<&BlobRef>) -> Result<Option<String>>;

    // Project category operations
    fn create_category(&self, category: &ProjectCategory) -> Result<ProjectCategory>;
    fn get_category(&self, id: i64) -> Result<Option<ProjectCategory>>;
    fn get_category_by_name(&self, name: &str) -> Result<Option<ProjectCategory>>;
    fn list_categories(&self) -> Result<Vec<ProjectCategory>>;
    fn update_category(&self, category: &ProjectCategory) -> Result<()>;
    fn delete_category(&self, id: i64) -> Result<bool>;

    // Project operations
    fn create_project(&self, project: &Project) -> Result<Project>;
    fn get_project(&self, id: i64) -> Result<Option<Project>>;
    /// Ordered by created_at descending.
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn list_featured_projects(&self) -> Result<Vec<Project>>;
    fn list_projects_by_category(&self, category_id: i64) -> Result<Vec<Project>>;
    fn list_projects_by_skill(&self, skill_id: i64) -> Result<Vec<Project>>;
    fn list_projects_with_case_studies(&self) -> Result<Vec<Project>>;
    fn update_project(&self, project: &Project) -> Result<()>;
    /// Returns the blob keys of the project's images so the caller can
    /// release them. None when the project does not exist.
    fn delete_project(&self, id: i64) -> Result<Option<Vec<String>>>;
    /// Full replace: every project not in `ids` becomes unfeatured, every
    /// project in `ids` becomes featured.
    fn set_featured_projects(&self, ids: &[i64]) -> Result<()>;

    // Project-skill association operations
    /// Replace-all semantics. Ids that do not resolve to an existing skill
    /// are silently skipped.
    fn replace_project_skills(&self, project_id: i64, skill_ids: &[i64]) -> Result<()>;
    /// Upsert for a single (project, skill) pair.
    fn upsert_project_skill(&self, assoc: &ProjectSkill) -> Result<()>;
    fn list_project_skills(&self, project_id: i64) -> Result<Vec<(Skill, i64)>>;
    fn list_project_skill_ids(&self, project_id: i64) -> Result<Vec<i64>>;

    // Project image operations
    fn create_image(&self, image: &ProjectImage) -> Result<ProjectImage>;
    fn get_image(&self, id: i64) -> Result<Option<ProjectImage>>;
    fn list_project_images(&self, project_id: i64) -> Result<Vec<ProjectImage>>;
    fn update_image_caption(&self, id: i64, caption: &str) -> Result<()>;
    /// Atomically makes `id` the sole main image of its project.
    fn set_main_image(&self, id: i64) -> Result<()>;
    fn delete_image(&self, id: i64) -> Result<Option<String>>;
}
