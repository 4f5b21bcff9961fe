use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mapping::split_list;
use crate::server::response::ApiError;
use crate::types::*;

/// Deserializes a mapped payload into a typed request. Unknown fields are
/// ignored; missing required fields surface as a 400.
pub fn parse_request<T: serde::de::DeserializeOwned>(mapped: Value) -> Result<T, ApiError> {
    serde_json::from_value(mapped).map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))
}

fn default_scale() -> i64 {
    1
}

fn default_relevance() -> i64 {
    5
}

// ---- auth ----

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

// ---- personal info ----

/// Every field is optional: the same payload serves create-or-update, where
/// a first-time partial create fills required fields with empty strings.
#[derive(Debug, Deserialize)]
pub struct PersonalInfoPayload {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl PersonalInfoPayload {
    pub fn apply(self, info: &mut PersonalInfo) {
        if let Some(v) = self.full_name {
            info.full_name = v;
        }
        if let Some(v) = self.title {
            info.title = v;
        }
        if let Some(v) = self.bio {
            info.bio = Some(v);
        }
        if let Some(v) = self.email {
            info.email = Some(v);
        }
        if let Some(v) = self.phone {
            info.phone = Some(v);
        }
        if let Some(v) = self.location {
            info.location = Some(v);
        }
        if let Some(v) = self.linkedin {
            info.linkedin = Some(v);
        }
        if let Some(v) = self.github {
            info.github = Some(v);
        }
        if let Some(v) = self.website {
            info.website = Some(v);
        }
    }

    /// Minimal record used when a profile image arrives before the profile
    /// itself has been filled in.
    #[must_use]
    pub fn default_record() -> PersonalInfo {
        PersonalInfo {
            id: 0,
            full_name: String::new(),
            title: String::new(),
            bio: None,
            email: None,
            phone: None,
            location: None,
            linkedin: None,
            github: None,
            website: None,
            profile_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn into_new(self) -> PersonalInfo {
        PersonalInfo {
            id: 0,
            full_name: self.full_name.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            bio: self.bio,
            email: self.email,
            phone: self.phone,
            location: self.location,
            linkedin: self.linkedin,
            github: self.github,
            website: self.website,
            profile_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonalInfoResponse {
    pub id: i64,
    pub full_name: String,
    pub title: String,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub has_profile_image: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PersonalInfo> for PersonalInfoResponse {
    fn from(info: PersonalInfo) -> Self {
        Self {
            id: info.id,
            full_name: info.full_name,
            title: info.title,
            bio: info.bio,
            email: info.email,
            phone: info.phone,
            location: info.location,
            linkedin: info.linkedin,
            github: info.github,
            website: info.website,
            has_profile_image: info.profile_image.is_some(),
            created_at: info.created_at,
            updated_at: info.updated_at,
        }
    }
}

// ---- skills ----

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: String,
    #[serde(default = "default_scale")]
    pub proficiency: i64,
    #[serde(default)]
    pub years_experience: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub proficiency: Option<i64>,
    #[serde(default)]
    pub years_experience: Option<f64>,
}

impl UpdateSkillRequest {
    pub fn apply(self, skill: &mut Skill) {
        if let Some(v) = self.name {
            skill.name = v;
        }
        if let Some(v) = self.category {
            skill.category = v;
        }
        if let Some(v) = self.proficiency {
            skill.proficiency = v;
        }
        if let Some(v) = self.years_experience {
            skill.years_experience = v;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub years_experience: f64,
    pub has_icon: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Skill> for SkillResponse {
    fn from(skill: Skill) -> Self {
        Self {
            id: skill.id,
            name: skill.name,
            category: skill.category,
            proficiency: skill.proficiency,
            years_experience: skill.years_experience,
            has_icon: skill.icon.is_some(),
            created_at: skill.created_at,
            updated_at: skill.updated_at,
        }
    }
}

// ---- work experience ----

#[derive(Debug, Deserialize)]
pub struct CreateExperienceRequest {
    pub company: String,
    pub position: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub description: String,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExperienceRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_current: Option<bool>,
}

impl UpdateExperienceRequest {
    pub fn apply(self, exp: &mut WorkExperience) {
        let end_date_patched = self.end_date.is_some();
        if let Some(v) = self.company {
            exp.company = v;
        }
        if let Some(v) = self.position {
            exp.position = v;
        }
        if let Some(v) = self.start_date {
            exp.start_date = v;
        }
        if let Some(v) = self.end_date {
            exp.end_date = Some(v);
        }
        if let Some(v) = self.description {
            exp.description = v;
        }
        if let Some(v) = self.achievements {
            exp.achievements = Some(v);
        }
        if let Some(v) = self.location {
            exp.location = Some(v);
        }
        if let Some(v) = self.is_current {
            exp.is_current = v;
            // Marking an entry current clears a stale stored end date. An
            // end date sent in the same patch is kept so the post-merge
            // validation can reject the contradiction.
            if v && !end_date_patched {
                exp.end_date = None;
            }
        }
    }
}

/// External shape: `job_title` instead of `position`, achievements as a
/// list.
#[derive(Debug, Serialize)]
pub struct ExperienceResponse {
    pub id: i64,
    pub company: String,
    pub job_title: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: String,
    pub achievements: Vec<String>,
    pub location: Option<String>,
    pub is_current: bool,
    pub has_company_logo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkExperience> for ExperienceResponse {
    fn from(exp: WorkExperience) -> Self {
        Self {
            id: exp.id,
            company: exp.company,
            job_title: exp.position,
            start_date: exp.start_date,
            end_date: exp.end_date,
            description: exp.description,
            achievements: exp
                .achievements
                .as_deref()
                .map(|s| split_list(s, "\n"))
                .unwrap_or_default(),
            location: exp.location,
            is_current: exp.is_current,
            has_company_logo: exp.company_logo.is_some(),
            created_at: exp.created_at,
            updated_at: exp.updated_at,
        }
    }
}

// ---- education ----

#[derive(Debug, Deserialize)]
pub struct CreateEducationRequest {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    pub education_type: String,
    #[serde(default)]
    pub degree_level: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub honors: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_certification: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEducationRequest {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub education_type: Option<String>,
    #[serde(default)]
    pub degree_level: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub honors: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_current: Option<bool>,
    #[serde(default)]
    pub is_certification: Option<bool>,
}

impl UpdateEducationRequest {
    pub fn apply(self, edu: &mut Education) {
        let end_date_patched = self.end_date.is_some();
        if let Some(v) = self.institution {
            edu.institution = v;
        }
        if let Some(v) = self.degree {
            edu.degree = v;
        }
        if let Some(v) = self.field_of_study {
            edu.field_of_study = Some(v);
        }
        if let Some(v) = self.education_type {
            edu.education_type = v;
        }
        if let Some(v) = self.degree_level {
            edu.degree_level = Some(v);
        }
        if let Some(v) = self.start_date {
            edu.start_date = v;
        }
        if let Some(v) = self.end_date {
            edu.end_date = Some(v);
        }
        if let Some(v) = self.gpa {
            edu.gpa = Some(v);
        }
        if let Some(v) = self.honors {
            edu.honors = Some(v);
        }
        if let Some(v) = self.description {
            edu.description = Some(v);
        }
        if let Some(v) = self.is_current {
            edu.is_current = v;
            // Same contradiction rule as work experience patches.
            if v && !end_date_patched {
                edu.end_date = None;
            }
        }
        if let Some(v) = self.is_certification {
            edu.is_certification = v;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EducationResponse {
    pub id: i64,
    pub institution_name: String,
    pub degree_title: String,
    pub field_of_study: Option<String>,
    pub education_type: String,
    pub degree_level: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub honors: Option<String>,
    pub description: Option<String>,
    pub is_current: bool,
    pub is_certification: bool,
    pub has_institution_logo: bool,
    pub has_certificate: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Education> for EducationResponse {
    fn from(edu: Education) -> Self {
        Self {
            id: edu.id,
            institution_name: edu.institution,
            degree_title: edu.degree,
            field_of_study: edu.field_of_study,
            education_type: edu.education_type,
            degree_level: edu.degree_level,
            start_date: edu.start_date,
            end_date: edu.end_date,
            gpa: edu.gpa,
            honors: edu.honors,
            description: edu.description,
            is_current: edu.is_current,
            is_certification: edu.is_certification,
            has_institution_logo: edu.institution_logo.is_some(),
            has_certificate: edu.certificate.is_some(),
            created_at: edu.created_at,
            updated_at: edu.updated_at,
        }
    }
}

// ---- project categories ----

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn apply(self, category: &mut ProjectCategory) {
        if let Some(v) = self.name {
            category.name = v;
        }
        if let Some(v) = self.description {
            category.description = Some(v);
        }
    }
}

// ---- projects ----

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default = "default_scale")]
    pub difficulty_level: i64,
    pub status: String,
    pub is_deployed: bool,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub featured: bool,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub solution_approach: Option<String>,
    #[serde(default)]
    pub key_challenges: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub results_achieved: Option<String>,
    /// Separated from the scalar fields; reconciled after the row is
    /// persisted.
    #[serde(default)]
    pub skill_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub technologies: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub difficulty_level: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_deployed: Option<bool>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub solution_approach: Option<String>,
    #[serde(default)]
    pub key_challenges: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub results_achieved: Option<String>,
    #[serde(default)]
    pub skill_ids: Option<Vec<i64>>,
}

impl UpdateProjectRequest {
    pub fn apply(self, project: &mut Project) {
        if let Some(v) = self.title {
            project.title = v;
        }
        if let Some(v) = self.description {
            project.description = v;
        }
        if let Some(v) = self.detailed_description {
            project.detailed_description = Some(v);
        }
        if let Some(v) = self.technologies {
            project.technologies = v;
        }
        if let Some(v) = self.category_id {
            project.category_id = Some(v);
        }
        if let Some(v) = self.difficulty_level {
            project.difficulty_level = v;
        }
        if let Some(v) = self.status {
            project.status = v;
        }
        if let Some(v) = self.is_deployed {
            project.is_deployed = v;
        }
        if let Some(v) = self.live_url {
            project.live_url = Some(v);
        }
        if let Some(v) = self.github_url {
            project.github_url = Some(v);
        }
        if let Some(v) = self.client_name {
            project.client_name = Some(v);
        }
        if let Some(v) = self.start_date {
            project.start_date = Some(v);
        }
        if let Some(v) = self.end_date {
            project.end_date = Some(v);
        }
        if let Some(v) = self.featured {
            project.featured = v;
        }
        if let Some(v) = self.problem_statement {
            project.problem_statement = Some(v);
        }
        if let Some(v) = self.solution_approach {
            project.solution_approach = Some(v);
        }
        if let Some(v) = self.key_challenges {
            project.key_challenges = Some(v);
        }
        if let Some(v) = self.lessons_learned {
            project.lessons_learned = Some(v);
        }
        if let Some(v) = self.results_achieved {
            project.results_achieved = Some(v);
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignSkillRequest {
    pub skill_id: i64,
    #[serde(default = "default_relevance")]
    pub relevance_score: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSkillsRequest {
    pub skill_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BulkFeaturedRequest {
    pub project_ids: Vec<i64>,
}

/// Skill as nested under a project, carrying the association's relevance.
#[derive(Debug, Serialize)]
pub struct ProjectSkillEntry {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub relevance_score: i64,
}

/// External shape: `name`, `project_url`, `is_featured`; technologies as a
/// list; nested skills with relevance.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub detailed_description: Option<String>,
    pub technologies: Vec<String>,
    pub category_id: Option<i64>,
    pub difficulty_level: i64,
    pub status: String,
    pub is_deployed: bool,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub client_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_featured: bool,
    pub problem_statement: Option<String>,
    pub solution_approach: Option<String>,
    pub key_challenges: Option<String>,
    pub lessons_learned: Option<String>,
    pub results_achieved: Option<String>,
    pub has_case_study: bool,
    pub skills: Vec<ProjectSkillEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    #[must_use]
    pub fn from_parts(project: Project, skills: Vec<(Skill, i64)>) -> Self {
        let has_case_study = project.has_case_study();
        Self {
            id: project.id,
            name: project.title,
            description: project.description,
            detailed_description: project.detailed_description,
            technologies: split_list(&project.technologies, ","),
            category_id: project.category_id,
            difficulty_level: project.difficulty_level,
            status: project.status,
            is_deployed: project.is_deployed,
            project_url: project.live_url,
            github_url: project.github_url,
            client_name: project.client_name,
            start_date: project.start_date,
            end_date: project.end_date,
            is_featured: project.featured,
            problem_statement: project.problem_statement,
            solution_approach: project.solution_approach,
            key_challenges: project.key_challenges,
            lessons_learned: project.lessons_learned,
            results_achieved: project.results_achieved,
            has_case_study,
            skills: skills
                .into_iter()
                .map(|(skill, relevance_score)| ProjectSkillEntry {
                    id: skill.id,
                    name: skill.name,
                    category: skill.category,
                    proficiency: skill.proficiency,
                    relevance_score,
                })
                .collect(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

// ---- project images ----

#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    pub caption: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectImageResponse {
    pub id: i64,
    pub project_id: i64,
    pub caption: Option<String>,
    pub is_main: bool,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectImage> for ProjectImageResponse {
    fn from(image: ProjectImage) -> Self {
        Self {
            id: image.id,
            project_id: image.project_id,
            caption: image.caption,
            is_main: image.is_main,
            mime_type: image.image.mime,
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }
}

/// Per-file outcome of a multipart image batch.
#[derive(Debug, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<ProjectImageResponse>,
    pub failed: Vec<UploadFailure>,
}

#[derive(Debug, Serialize)]
pub struct UploadFailure {
    pub index: usize,
    pub filename: Option<String>,
    pub error: String,
}

// ---- public aggregate ----

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub personal_info: Option<PersonalInfoResponse>,
    pub skills: Vec<SkillResponse>,
    pub experience: Vec<ExperienceResponse>,
    pub education: Vec<EducationResponse>,
    pub featured_projects: Vec<ProjectResponse>,
}
