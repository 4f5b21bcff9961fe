use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Stored timestamps are RFC 3339, with SQLite's default
/// "YYYY-MM-DD HH:MM:SS" accepted for rows created by column defaults.
/// Anything else is a conversion failure surfaced to the caller.
fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Reassembles a nullable (blob, mime) column pair into a BlobRef.
fn blob_ref(key: Option<String>, mime: Option<String>) -> Option<BlobRef> {
    match (key, mime) {
        (Some(key), Some(mime)) => Some(BlobRef { key, mime }),
        _ => None,
    }
}

const PERSONAL_INFO_COLS: &str = "id, full_name, title, bio, email, phone, location, linkedin, \
     github, website, profile_image_blob, profile_image_mime, created_at, updated_at";

fn personal_info_from_row(row: &Row) -> rusqlite::Result<PersonalInfo> {
    Ok(PersonalInfo {
        id: row.get(0)?,
        full_name: row.get(1)?,
        title: row.get(2)?,
        bio: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        location: row.get(6)?,
        linkedin: row.get(7)?,
        github: row.get(8)?,
        website: row.get(9)?,
        profile_image: blob_ref(row.get(10)?, row.get(11)?),
        created_at: parse_datetime(12, &row.get::<_, String>(12)?)?,
        updated_at: parse_datetime(13, &row.get::<_, String>(13)?)?,
    })
}

const SKILL_COLS: &str =
    "id, name, category, proficiency, years_experience, icon_blob, icon_mime, created_at, updated_at";

fn skill_from_row(row: &Row) -> rusqlite::Result<Skill> {
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        proficiency: row.get(3)?,
        years_experience: row.get(4)?,
        icon: blob_ref(row.get(5)?, row.get(6)?),
        created_at: parse_datetime(7, &row.get::<_, String>(7)?)?,
        updated_at: parse_datetime(8, &row.get::<_, String>(8)?)?,
    })
}

const EXPERIENCE_COLS: &str = "id, company, position, start_date, end_date, description, \
     achievements, location, is_current, company_logo_blob, company_logo_mime, created_at, updated_at";

fn experience_from_row(row: &Row) -> rusqlite::Result<WorkExperience> {
    Ok(WorkExperience {
        id: row.get(0)?,
        company: row.get(1)?,
        position: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        description: row.get(5)?,
        achievements: row.get(6)?,
        location: row.get(7)?,
        is_current: row.get(8)?,
        company_logo: blob_ref(row.get(9)?, row.get(10)?),
        created_at: parse_datetime(11, &row.get::<_, String>(11)?)?,
        updated_at: parse_datetime(12, &row.get::<_, String>(12)?)?,
    })
}

const EDUCATION_COLS: &str = "id, institution, degree, field_of_study, education_type, \
     degree_level, start_date, end_date, gpa, honors, description, is_current, is_certification, \
     institution_logo_blob, institution_logo_mime, certificate_blob, certificate_mime, \
     created_at, updated_at";

fn education_from_row(row: &Row) -> rusqlite::Result<Education> {
    Ok(Education {
        id: row.get(0)?,
        institution: row.get(1)?,
        degree: row.get(2)?,
        field_of_study: row.get(3)?,
        education_type: row.get(4)?,
        degree_level: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
        gpa: row.get(8)?,
        honors: row.get(9)?,
        description: row.get(10)?,
        is_current: row.get(11)?,
        is_certification: row.get(12)?,
        institution_logo: blob_ref(row.get(13)?, row.get(14)?),
        certificate: blob_ref(row.get(15)?, row.get(16)?),
        created_at: parse_datetime(17, &row.get::<_, String>(17)?)?,
        updated_at: parse_datetime(18, &row.get::<_, String>(18)?)?,
    })
}

const CATEGORY_COLS: &str = "id, name, description, created_at, updated_at";

fn category_from_row(row: &Row) -> rusqlite::Result<ProjectCategory> {
    Ok(ProjectCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_datetime(3, &row.get::<_, String>(3)?)?,
        updated_at: parse_datetime(4, &row.get::<_, String>(4)?)?,
    })
}

const PROJECT_COLS: &str = "id, title, description, detailed_description, technologies, \
     category_id, difficulty_level, status, is_deployed, live_url, github_url, client_name, \
     start_date, end_date, featured, problem_statement, solution_approach, key_challenges, \
     lessons_learned, results_achieved, created_at, updated_at";

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        detailed_description: row.get(3)?,
        technologies: row.get(4)?,
        category_id: row.get(5)?,
        difficulty_level: row.get(6)?,
        status: row.get(7)?,
        is_deployed: row.get(8)?,
        live_url: row.get(9)?,
        github_url: row.get(10)?,
        client_name: row.get(11)?,
        start_date: row.get(12)?,
        end_date: row.get(13)?,
        featured: row.get(14)?,
        problem_statement: row.get(15)?,
        solution_approach: row.get(16)?,
        key_challenges: row.get(17)?,
        lessons_learned: row.get(18)?,
        results_achieved: row.get(19)?,
        created_at: parse_datetime(20, &row.get::<_, String>(20)?)?,
        updated_at: parse_datetime(21, &row.get::<_, String>(21)?)?,
    })
}

const IMAGE_COLS: &str =
    "id, project_id, caption, is_main, image_blob, image_mime, created_at, updated_at";

fn image_from_row(row: &Row) -> rusqlite::Result<ProjectImage> {
    Ok(ProjectImage {
        id: row.get(0)?,
        project_id: row.get(1)?,
        caption: row.get(2)?,
        is_main: row.get(3)?,
        image: BlobRef {
            key: row.get(4)?,
            mime: row.get(5)?,
        },
        created_at: parse_datetime(6, &row.get::<_, String>(6)?)?,
        updated_at: parse_datetime(7, &row.get::<_, String>(7)?)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Personal info (singleton)

    fn get_personal_info(&self) -> Result<Option<PersonalInfo>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PERSONAL_INFO_COLS} FROM personal_info LIMIT 1"),
            [],
            personal_info_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn create_personal_info(&self, info: &PersonalInfo) -> Result<PersonalInfo> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM personal_info", [], |r| r.get(0))?;
        if count > 0 {
            return Err(Error::SingletonViolation("PersonalInfo"));
        }

        tx.execute(
            "INSERT INTO personal_info (full_name, title, bio, email, phone, location, linkedin,
                 github, website, profile_image_blob, profile_image_mime, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                info.full_name,
                info.title,
                info.bio,
                info.email,
                info.phone,
                info.location,
                info.linkedin,
                info.github,
                info.website,
                info.profile_image.as_ref().map(|b| &b.key),
                info.profile_image.as_ref().map(|b| &b.mime),
                format_datetime(&Utc::now()),
            ],
        )?;
        let id = tx.last_insert_rowid();

        let created = tx.query_row(
            &format!("SELECT {PERSONAL_INFO_COLS} FROM personal_info WHERE id = ?1"),
            params![id],
            personal_info_from_row,
        )?;
        tx.commit()?;
        Ok(created)
    }

    fn update_personal_info(&self, info: &PersonalInfo) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE personal_info SET full_name = ?1, title = ?2, bio = ?3, email = ?4,
                 phone = ?5, location = ?6, linkedin = ?7, github = ?8, website = ?9,
                 updated_at = ?10
             WHERE id = ?11",
            params![
                info.full_name,
                info.title,
                info.bio,
                info.email,
                info.phone,
                info.location,
                info.linkedin,
                info.github,
                info.website,
                format_datetime(&Utc::now()),
                info.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_profile_image(&self, image: Option<&BlobRef>) -> Result<Option<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let previous: Option<String> = tx
            .query_row(
                "SELECT profile_image_blob FROM personal_info LIMIT 1",
                [],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(Error::NotFound)?;

        tx.execute(
            "UPDATE personal_info SET profile_image_blob = ?1, profile_image_mime = ?2,
                 updated_at = ?3",
            params![
                image.map(|b| &b.key),
                image.map(|b| &b.mime),
                format_datetime(&Utc::now()),
            ],
        )?;
        tx.commit()?;
        Ok(previous)
    }

    // Skill operations

    fn create_skill(&self, skill: &Skill) -> Result<Skill> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO skills (name, category, proficiency, years_experience, icon_blob,
                 icon_mime, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                skill.name,
                skill.category,
                skill.proficiency,
                skill.years_experience,
                skill.icon.as_ref().map(|b| &b.key),
                skill.icon.as_ref().map(|b| &b.mime),
                format_datetime(&Utc::now()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {SKILL_COLS} FROM skills WHERE id = ?1"),
            params![id],
            skill_from_row,
        )
        .map_err(Error::from)
    }

    fn get_skill(&self, id: i64) -> Result<Option<Skill>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SKILL_COLS} FROM skills WHERE id = ?1"),
            params![id],
            skill_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_skills(&self) -> Result<Vec<Skill>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {SKILL_COLS} FROM skills ORDER BY id"))?;
        let rows = stmt.query_map([], skill_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_skills_by_category(&self, category: &str) -> Result<Vec<Skill>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SKILL_COLS} FROM skills WHERE category = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![category], skill_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_skill_categories(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT DISTINCT category FROM skills ORDER BY category")?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_skill(&self, skill: &Skill) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE skills SET name = ?1, category = ?2, proficiency = ?3,
                 years_experience = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                skill.name,
                skill.category,
                skill.proficiency,
                skill.years_experience,
                format_datetime(&Utc::now()),
                skill.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_skill(&self, id: i64) -> Result<Option<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let icon: Option<String> = tx
            .query_row(
                "SELECT icon_blob FROM skills WHERE id = ?1",
                params![id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(Error::NotFound)?;
        tx.execute("DELETE FROM skills WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(icon)
    }

    fn set_skill_icon(&self, id: i64, icon: Option<&BlobRef>) -> Result<Option<String>> {
        set_blob_pair(&mut self.conn(), "skills", "icon", id, icon)
    }

    // Work experience operations

    fn create_experience(&self, exp: &WorkExperience) -> Result<WorkExperience> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO work_experiences (company, position, start_date, end_date, description,
                 achievements, location, is_current, company_logo_blob, company_logo_mime,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                exp.company,
                exp.position,
                exp.start_date,
                exp.end_date,
                exp.description,
                exp.achievements,
                exp.location,
                exp.is_current,
                exp.company_logo.as_ref().map(|b| &b.key),
                exp.company_logo.as_ref().map(|b| &b.mime),
                format_datetime(&Utc::now()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {EXPERIENCE_COLS} FROM work_experiences WHERE id = ?1"),
            params![id],
            experience_from_row,
        )
        .map_err(Error::from)
    }

    fn get_experience(&self, id: i64) -> Result<Option<WorkExperience>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {EXPERIENCE_COLS} FROM work_experiences WHERE id = ?1"),
            params![id],
            experience_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_experiences(&self) -> Result<Vec<WorkExperience>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPERIENCE_COLS} FROM work_experiences ORDER BY start_date DESC"
        ))?;
        let rows = stmt.query_map([], experience_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_current_experiences(&self) -> Result<Vec<WorkExperience>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPERIENCE_COLS} FROM work_experiences WHERE is_current = 1
             ORDER BY start_date DESC"
        ))?;
        let rows = stmt.query_map([], experience_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_experience(&self, exp: &WorkExperience) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE work_experiences SET company = ?1, position = ?2, start_date = ?3,
                 end_date = ?4, description = ?5, achievements = ?6, location = ?7,
                 is_current = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                exp.company,
                exp.position,
                exp.start_date,
                exp.end_date,
                exp.description,
                exp.achievements,
                exp.location,
                exp.is_current,
                format_datetime(&Utc::now()),
                exp.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_experience(&self, id: i64) -> Result<Option<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let logo: Option<String> = tx
            .query_row(
                "SELECT company_logo_blob FROM work_experiences WHERE id = ?1",
                params![id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(Error::NotFound)?;
        tx.execute("DELETE FROM work_experiences WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(logo)
    }

    fn set_company_logo(&self, id: i64, logo: Option<&BlobRef>) -> Result<Option<String>> {
        set_blob_pair(&mut self.conn(), "work_experiences", "company_logo", id, logo)
    }

    // Education operations

    fn create_education(&self, edu: &Education) -> Result<Education> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO education (institution, degree, field_of_study, education_type,
                 degree_level, start_date, end_date, gpa, honors, description, is_current,
                 is_certification, institution_logo_blob, institution_logo_mime,
                 certificate_blob, certificate_mime, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)",
            params![
                edu.institution,
                edu.degree,
                edu.field_of_study,
                edu.education_type,
                edu.degree_level,
                edu.start_date,
                edu.end_date,
                edu.gpa,
                edu.honors,
                edu.description,
                edu.is_current,
                edu.is_certification,
                edu.institution_logo.as_ref().map(|b| &b.key),
                edu.institution_logo.as_ref().map(|b| &b.mime),
                edu.certificate.as_ref().map(|b| &b.key),
                edu.certificate.as_ref().map(|b| &b.mime),
                format_datetime(&Utc::now()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {EDUCATION_COLS} FROM education WHERE id = ?1"),
            params![id],
            education_from_row,
        )
        .map_err(Error::from)
    }

    fn get_education(&self, id: i64) -> Result<Option<Education>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {EDUCATION_COLS} FROM education WHERE id = ?1"),
            params![id],
            education_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_education(&self) -> Result<Vec<Education>> {
        let conn = self.conn();
        // NULL end_date (ongoing) sorts first, then most recently finished.
        let mut stmt = conn.prepare(&format!(
            "SELECT {EDUCATION_COLS} FROM education
             ORDER BY end_date IS NOT NULL, end_date DESC"
        ))?;
        let rows = stmt.query_map([], education_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_degrees(&self) -> Result<Vec<Education>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EDUCATION_COLS} FROM education WHERE is_certification = 0
             ORDER BY end_date IS NOT NULL, end_date DESC"
        ))?;
        let rows = stmt.query_map([], education_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_certifications(&self) -> Result<Vec<Education>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EDUCATION_COLS} FROM education WHERE is_certification = 1
             ORDER BY end_date IS NOT NULL, end_date DESC"
        ))?;
        let rows = stmt.query_map([], education_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_current_education(&self) -> Result<Vec<Education>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {EDUCATION_COLS} FROM education WHERE is_current = 1 ORDER BY id"
        ))?;
        let rows = stmt.query_map([], education_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_education(&self, edu: &Education) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE education SET institution = ?1, degree = ?2, field_of_study = ?3,
                 education_type = ?4, degree_level = ?5, start_date = ?6, end_date = ?7,
                 gpa = ?8, honors = ?9, description = ?10, is_current = ?11,
                 is_certification = ?12, updated_at = ?13
             WHERE id = ?14",
            params![
                edu.institution,
                edu.degree,
                edu.field_of_study,
                edu.education_type,
                edu.degree_level,
                edu.start_date,
                edu.end_date,
                edu.gpa,
                edu.honors,
                edu.description,
                edu.is_current,
                edu.is_certification,
                format_datetime(&Utc::now()),
                edu.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_education(&self, id: i64) -> Result<Vec<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let blobs: (Option<String>, Option<String>) = tx
            .query_row(
                "SELECT institution_logo_blob, certificate_blob FROM education WHERE id = ?1",
                params![id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?
            .ok_or(Error::NotFound)?;
        tx.execute("DELETE FROM education WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok([blobs.0, blobs.1].into_iter().flatten().collect())
    }

    fn set_institution_logo(&self, id: i64, logo: Option<&BlobRef>) -> Result<Option<String>> {
        set_blob_pair(&mut self.conn(), "education", "institution_logo", id, logo)
    }

    fn set_certificate(&self, id: i64, cert: Option<&BlobRef>) -> Result<Option<String>> {
        set_blob_pair(&mut self.conn(), "education", "certificate", id, cert)
    }

    // Project category operations

    fn create_category(&self, category: &ProjectCategory) -> Result<ProjectCategory> {
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO project_categories (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![
                category.name,
                category.description,
                format_datetime(&Utc::now()),
            ],
        );
        if let Err(rusqlite::Error::SqliteFailure(e, _)) = &result {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                return Err(Error::Conflict(format!(
                    "category '{}' already exists",
                    category.name
                )));
            }
        }
        result?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {CATEGORY_COLS} FROM project_categories WHERE id = ?1"),
            params![id],
            category_from_row,
        )
        .map_err(Error::from)
    }

    fn get_category(&self, id: i64) -> Result<Option<ProjectCategory>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {CATEGORY_COLS} FROM project_categories WHERE id = ?1"),
            params![id],
            category_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_category_by_name(&self, name: &str) -> Result<Option<ProjectCategory>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {CATEGORY_COLS} FROM project_categories WHERE name = ?1"),
            params![name],
            category_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_categories(&self) -> Result<Vec<ProjectCategory>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CATEGORY_COLS} FROM project_categories ORDER BY name"
        ))?;
        let rows = stmt.query_map([], category_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_category(&self, category: &ProjectCategory) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE project_categories SET name = ?1, description = ?2, updated_at = ?3
             WHERE id = ?4",
            params![
                category.name,
                category.description,
                format_datetime(&Utc::now()),
                category.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_category(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM project_categories WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Project operations

    fn create_project(&self, project: &Project) -> Result<Project> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO projects (title, description, detailed_description, technologies,
                 category_id, difficulty_level, status, is_deployed, live_url, github_url,
                 client_name, start_date, end_date, featured, problem_statement,
                 solution_approach, key_challenges, lessons_learned, results_achieved,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18, ?19, ?20, ?20)",
            params![
                project.title,
                project.description,
                project.detailed_description,
                project.technologies,
                project.category_id,
                project.difficulty_level,
                project.status,
                project.is_deployed,
                project.live_url,
                project.github_url,
                project.client_name,
                project.start_date,
                project.end_date,
                project.featured,
                project.problem_statement,
                project.solution_approach,
                project.key_challenges,
                project.lessons_learned,
                project.results_achieved,
                format_datetime(&Utc::now()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {PROJECT_COLS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .map_err(Error::from)
    }

    fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLS} FROM projects ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_featured_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLS} FROM projects WHERE featured = 1
             ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_projects_by_category(&self, category_id: i64) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLS} FROM projects WHERE category_id = ?1
             ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![category_id], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_projects_by_skill(&self, skill_id: i64) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.title, p.description, p.detailed_description, p.technologies,
                    p.category_id, p.difficulty_level, p.status, p.is_deployed, p.live_url,
                    p.github_url, p.client_name, p.start_date, p.end_date, p.featured,
                    p.problem_statement, p.solution_approach, p.key_challenges,
                    p.lessons_learned, p.results_achieved, p.created_at, p.updated_at
             FROM projects p
             JOIN project_skills ps ON ps.project_id = p.id
             WHERE ps.skill_id = ?1
             ORDER BY p.created_at DESC, p.id DESC",
        )?;
        let rows = stmt.query_map(params![skill_id], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_projects_with_case_studies(&self) -> Result<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLS} FROM projects
             WHERE problem_statement IS NOT NULL AND problem_statement != ''
               AND solution_approach IS NOT NULL AND solution_approach != ''
             ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], project_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_project(&self, project: &Project) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE projects SET title = ?1, description = ?2, detailed_description = ?3,
                 technologies = ?4, category_id = ?5, difficulty_level = ?6, status = ?7,
                 is_deployed = ?8, live_url = ?9, github_url = ?10, client_name = ?11,
                 start_date = ?12, end_date = ?13, featured = ?14, problem_statement = ?15,
                 solution_approach = ?16, key_challenges = ?17, lessons_learned = ?18,
                 results_achieved = ?19, updated_at = ?20
             WHERE id = ?21",
            params![
                project.title,
                project.description,
                project.detailed_description,
                project.technologies,
                project.category_id,
                project.difficulty_level,
                project.status,
                project.is_deployed,
                project.live_url,
                project.github_url,
                project.client_name,
                project.start_date,
                project.end_date,
                project.featured,
                project.problem_statement,
                project.solution_approach,
                project.key_challenges,
                project.lessons_learned,
                project.results_achieved,
                format_datetime(&Utc::now()),
                project.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_project(&self, id: i64) -> Result<Option<Vec<String>>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let blobs: Vec<String> = {
            let mut stmt =
                tx.prepare("SELECT image_blob FROM project_images WHERE project_id = ?1")?;
            let rows = stmt.query_map(params![id], |r| r.get(0))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        // Image and junction rows go with the project via FK cascade.
        let rows = tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        tx.commit()?;

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(blobs))
    }

    fn set_featured_projects(&self, ids: &[i64]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("UPDATE projects SET featured = 0 WHERE featured = 1", [])?;
        {
            let mut stmt = tx.prepare("UPDATE projects SET featured = 1 WHERE id = ?1")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // Project-skill association operations

    fn replace_project_skills(&self, project_id: i64, skill_ids: &[i64]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM project_skills WHERE project_id = ?1",
            params![project_id],
        )?;
        {
            // Unknown skill ids fall through the WHERE clause instead of erroring.
            let mut stmt = tx.prepare(
                "INSERT INTO project_skills (project_id, skill_id, relevance_score)
                 SELECT ?1, id, 5 FROM skills WHERE id = ?2",
            )?;
            for skill_id in skill_ids {
                stmt.execute(params![project_id, skill_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_project_skill(&self, assoc: &ProjectSkill) -> Result<()> {
        self.conn().execute(
            "INSERT INTO project_skills (project_id, skill_id, relevance_score)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (project_id, skill_id) DO UPDATE SET relevance_score = ?3",
            params![assoc.project_id, assoc.skill_id, assoc.relevance_score],
        )?;
        Ok(())
    }

    fn list_project_skills(&self, project_id: i64) -> Result<Vec<(Skill, i64)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.category, s.proficiency, s.years_experience, s.icon_blob,
                    s.icon_mime, s.created_at, s.updated_at, ps.relevance_score
             FROM skills s
             JOIN project_skills ps ON ps.skill_id = s.id
             WHERE ps.project_id = ?1
             ORDER BY ps.relevance_score DESC, s.id",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((skill_from_row(row)?, row.get(9)?))
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_project_skill_ids(&self, project_id: i64) -> Result<Vec<i64>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT skill_id FROM project_skills WHERE project_id = ?1 ORDER BY skill_id",
        )?;
        let rows = stmt.query_map(params![project_id], |r| r.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Project image operations

    fn create_image(&self, image: &ProjectImage) -> Result<ProjectImage> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO project_images (project_id, caption, is_main, image_blob, image_mime,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                image.project_id,
                image.caption,
                image.is_main,
                image.image.key,
                image.image.mime,
                format_datetime(&Utc::now()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {IMAGE_COLS} FROM project_images WHERE id = ?1"),
            params![id],
            image_from_row,
        )
        .map_err(Error::from)
    }

    fn get_image(&self, id: i64) -> Result<Option<ProjectImage>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {IMAGE_COLS} FROM project_images WHERE id = ?1"),
            params![id],
            image_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_project_images(&self, project_id: i64) -> Result<Vec<ProjectImage>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {IMAGE_COLS} FROM project_images WHERE project_id = ?1
             ORDER BY is_main DESC, id"
        ))?;
        let rows = stmt.query_map(params![project_id], image_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_image_caption(&self, id: i64, caption: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE project_images SET caption = ?1, updated_at = ?2 WHERE id = ?3",
            params![caption, format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_main_image(&self, id: i64) -> Result<()> {
        // One statement over all siblings; there is no intermediate state
        // where the project has zero or two main images.
        let rows = self.conn().execute(
            "UPDATE project_images
             SET is_main = (id = ?1), updated_at = ?2
             WHERE project_id = (SELECT project_id FROM project_images WHERE id = ?1)",
            params![id, format_datetime(&Utc::now())],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_image(&self, id: i64) -> Result<Option<String>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let blob: Option<String> = tx
            .query_row(
                "SELECT image_blob FROM project_images WHERE id = ?1",
                params![id],
                |r| r.get(0),
            )
            .optional()?;
        let Some(blob) = blob else {
            return Ok(None);
        };
        tx.execute("DELETE FROM project_images WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Some(blob))
    }
}

/// Updates a `<field>_blob` / `<field>_mime` column pair and returns the
/// previous blob key. Table and field names are compile-time constants from
/// the callers, never user input.
fn set_blob_pair(
    conn: &mut Connection,
    table: &str,
    field: &str,
    id: i64,
    blob: Option<&BlobRef>,
) -> Result<Option<String>> {
    let tx = conn.transaction()?;

    let previous: Option<String> = tx
        .query_row(
            &format!("SELECT {field}_blob FROM {table} WHERE id = ?1"),
            params![id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or(Error::NotFound)?;

    tx.execute(
        &format!(
            "UPDATE {table} SET {field}_blob = ?1, {field}_mime = ?2, updated_at = ?3
             WHERE id = ?4"
        ),
        params![
            blob.map(|b| &b.key),
            blob.map(|b| &b.mime),
            format_datetime(&Utc::now()),
            id,
        ],
    )?;
    tx.commit()?;
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn sample_skill(name: &str, category: &str) -> Skill {
        Skill {
            id: 0,
            name: name.to_string(),
            category: category.to_string(),
            proficiency: 4,
            years_experience: 2.5,
            icon: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_project(title: &str) -> Project {
        Project {
            id: 0,
            title: title.to_string(),
            description: "desc".to_string(),
            detailed_description: None,
            technologies: "Go, Rust".to_string(),
            category_id: None,
            difficulty_level: 3,
            status: "completed".to_string(),
            is_deployed: false,
            live_url: None,
            github_url: None,
            client_name: None,
            start_date: None,
            end_date: None,
            featured: false,
            problem_statement: None,
            solution_approach: None,
            key_challenges: None,
            lessons_learned: None,
            results_achieved: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_image(project_id: i64, is_main: bool) -> ProjectImage {
        ProjectImage {
            id: 0,
            project_id,
            caption: None,
            is_main,
            image: BlobRef {
                key: uuid::Uuid::new_v4().to_string(),
                mime: "image/png".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn personal_info_singleton_enforced() {
        let store = test_store();
        let info = PersonalInfo {
            id: 0,
            full_name: "Ada".to_string(),
            title: "Engineer".to_string(),
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
        };

        let created = store.create_personal_info(&info).unwrap();
        assert!(created.id > 0);

        let err = store.create_personal_info(&info).unwrap_err();
        assert!(matches!(err, Error::SingletonViolation("PersonalInfo")));

        let fetched = store.get_personal_info().unwrap().unwrap();
        assert_eq!(fetched.full_name, "Ada");
    }

    #[test]
    fn skill_crud_and_categories() {
        let store = test_store();
        let a = store.create_skill(&sample_skill("Go", "Backend")).unwrap();
        store.create_skill(&sample_skill("Rust", "Backend")).unwrap();
        store.create_skill(&sample_skill("Figma", "Design")).unwrap();

        assert_eq!(store.list_skills().unwrap().len(), 3);
        assert_eq!(store.list_skills_by_category("Backend").unwrap().len(), 2);
        assert_eq!(
            store.list_skill_categories().unwrap(),
            vec!["Backend", "Design"]
        );

        assert!(store.delete_skill(a.id).unwrap().is_none());
        assert!(store.get_skill(a.id).unwrap().is_none());
        assert!(matches!(store.delete_skill(a.id), Err(Error::NotFound)));
    }

    #[test]
    fn education_ordering_current_first() {
        let store = test_store();
        let mut edu = Education {
            id: 0,
            institution: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: None,
            education_type: "degree".to_string(),
            degree_level: None,
            start_date: "2015-09".to_string(),
            end_date: Some("2019-06".to_string()),
            gpa: None,
            honors: None,
            description: None,
            is_current: false,
            is_certification: false,
            institution_logo: None,
            certificate: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create_education(&edu).unwrap();

        edu.institution = "ETH".to_string();
        edu.end_date = Some("2021-06".to_string());
        store.create_education(&edu).unwrap();

        edu.institution = "Stanford".to_string();
        edu.end_date = None;
        edu.is_current = true;
        store.create_education(&edu).unwrap();

        let names: Vec<String> = store
            .list_education()
            .unwrap()
            .into_iter()
            .map(|e| e.institution)
            .collect();
        assert_eq!(names, vec!["Stanford", "ETH", "MIT"]);
    }

    #[test]
    fn replace_skills_skips_unknown_ids() {
        let store = test_store();
        let project = store.create_project(&sample_project("P")).unwrap();
        let s1 = store.create_skill(&sample_skill("Go", "Backend")).unwrap();
        let s2 = store.create_skill(&sample_skill("Rust", "Backend")).unwrap();

        store
            .replace_project_skills(project.id, &[s1.id, s2.id, 999])
            .unwrap();
        assert_eq!(
            store.list_project_skill_ids(project.id).unwrap(),
            vec![s1.id, s2.id]
        );

        // Replace-all removes prior associations.
        store.replace_project_skills(project.id, &[s2.id]).unwrap();
        assert_eq!(
            store.list_project_skill_ids(project.id).unwrap(),
            vec![s2.id]
        );
    }

    #[test]
    fn upsert_project_skill_updates_relevance() {
        let store = test_store();
        let project = store.create_project(&sample_project("P")).unwrap();
        let skill = store.create_skill(&sample_skill("Go", "Backend")).unwrap();

        store
            .upsert_project_skill(&ProjectSkill {
                project_id: project.id,
                skill_id: skill.id,
                relevance_score: 5,
            })
            .unwrap();
        store
            .upsert_project_skill(&ProjectSkill {
                project_id: project.id,
                skill_id: skill.id,
                relevance_score: 9,
            })
            .unwrap();

        let assocs = store.list_project_skills(project.id).unwrap();
        assert_eq!(assocs.len(), 1);
        assert_eq!(assocs[0].1, 9);
    }

    #[test]
    fn set_main_image_is_exclusive() {
        let store = test_store();
        let project = store.create_project(&sample_project("P")).unwrap();
        let a = store.create_image(&sample_image(project.id, true)).unwrap();
        let b = store.create_image(&sample_image(project.id, false)).unwrap();

        store.set_main_image(b.id).unwrap();

        let images = store.list_project_images(project.id).unwrap();
        let mains: Vec<i64> = images.iter().filter(|i| i.is_main).map(|i| i.id).collect();
        assert_eq!(mains, vec![b.id]);
        assert!(!images.iter().find(|i| i.id == a.id).unwrap().is_main);

        assert!(matches!(store.set_main_image(999), Err(Error::NotFound)));
    }

    #[test]
    fn delete_project_returns_image_blobs() {
        let store = test_store();
        let project = store.create_project(&sample_project("P")).unwrap();
        let skill = store.create_skill(&sample_skill("Go", "Backend")).unwrap();
        store
            .replace_project_skills(project.id, &[skill.id])
            .unwrap();

        let img1 = store.create_image(&sample_image(project.id, true)).unwrap();
        let img2 = store
            .create_image(&sample_image(project.id, false))
            .unwrap();

        let blobs = store.delete_project(project.id).unwrap().unwrap();
        assert_eq!(blobs.len(), 2);
        assert!(blobs.contains(&img1.image.key));
        assert!(blobs.contains(&img2.image.key));

        assert!(store.get_image(img1.id).unwrap().is_none());
        assert!(store.list_project_skill_ids(project.id).unwrap().is_empty());
        assert!(store.delete_project(project.id).unwrap().is_none());
    }

    #[test]
    fn corrupt_timestamps_surface_as_errors() {
        let store = test_store();
        let skill = store.create_skill(&sample_skill("Go", "Backend")).unwrap();

        store
            .conn()
            .execute("UPDATE skills SET created_at = 'not-a-timestamp'", [])
            .unwrap();

        assert!(matches!(
            store.get_skill(skill.id),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn bulk_featured_is_full_replace() {
        let store = test_store();
        let mut first = sample_project("one");
        first.featured = true;
        let first = store.create_project(&first).unwrap();
        let second = store.create_project(&sample_project("two")).unwrap();
        let third = store.create_project(&sample_project("three")).unwrap();

        store
            .set_featured_projects(&[second.id, third.id])
            .unwrap();

        let mut featured: Vec<i64> = store
            .list_featured_projects()
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        featured.sort();
        assert_eq!(featured, vec![second.id, third.id]);
        assert!(!store.get_project(first.id).unwrap().unwrap().featured);
    }
}
