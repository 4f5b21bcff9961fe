use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference into the blob store plus the MIME type detected at upload time.
/// The blob store itself only holds bytes; the type travels with the entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlobRef {
    pub key: String,
    pub mime: String,
}

/// The singleton personal-info record. The store never holds more than one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub id: i64,
    pub full_name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip)]
    pub profile_image: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// 1-5 scale.
    pub proficiency: i64,
    pub years_experience: f64,
    #[serde(skip)]
    pub icon: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperience {
    pub id: i64,
    pub company: String,
    pub position: String,
    /// "YYYY-MM"; lexical order equals chronological order.
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub description: String,
    /// Newline-joined list; split back for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_current: bool,
    #[serde(skip)]
    pub company_logo: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub institution: String,
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    pub education_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_level: Option<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_current: bool,
    pub is_certification: bool,
    #[serde(skip)]
    pub institution_logo: Option<BlobRef>,
    #[serde(skip)]
    pub certificate: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCategory {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    /// Comma-space-joined list; split back for display.
    pub technologies: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// 1-5 scale.
    pub difficulty_level: i64,
    pub status: String,
    pub is_deployed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_approach: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_challenges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons_learned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_achieved: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// A project counts as a case study once both narrative halves exist.
    #[must_use]
    pub fn has_case_study(&self) -> bool {
        fn present(f: &Option<String>) -> bool {
            f.as_deref().is_some_and(|s| !s.is_empty())
        }
        present(&self.problem_statement) && present(&self.solution_approach)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectImage {
    pub id: i64,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub is_main: bool,
    /// Required, unlike the other blob fields.
    #[serde(skip)]
    pub image: BlobRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Junction row between projects and skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSkill {
    pub project_id: i64,
    pub skill_id: i64,
    /// 1-10 scale, default 5.
    pub relevance_score: i64,
}
