pub const SCHEMA: &str = r#"
-- Singleton record; the application never inserts a second row
CREATE TABLE IF NOT EXISTS personal_info (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    title TEXT NOT NULL,
    bio TEXT,
    email TEXT,
    phone TEXT,
    location TEXT,
    linkedin TEXT,
    github TEXT,
    website TEXT,

    profile_image_blob TEXT,
    profile_image_mime TEXT,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS skills (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    proficiency INTEGER NOT NULL DEFAULT 1,   -- 1-5 scale
    years_experience REAL NOT NULL DEFAULT 0,

    icon_blob TEXT,
    icon_mime TEXT,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS work_experiences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company TEXT NOT NULL,
    position TEXT NOT NULL,
    start_date TEXT NOT NULL,   -- "YYYY-MM"
    end_date TEXT,              -- NULL = ongoing
    description TEXT NOT NULL,
    achievements TEXT,          -- newline-joined list
    location TEXT,
    is_current INTEGER NOT NULL DEFAULT 0,

    company_logo_blob TEXT,
    company_logo_mime TEXT,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS education (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    institution TEXT NOT NULL,
    degree TEXT NOT NULL,
    field_of_study TEXT,
    education_type TEXT NOT NULL DEFAULT 'degree',
    degree_level TEXT,
    start_date TEXT NOT NULL,
    end_date TEXT,              -- NULL = current
    gpa TEXT,
    honors TEXT,
    description TEXT,
    is_current INTEGER NOT NULL DEFAULT 0,
    is_certification INTEGER NOT NULL DEFAULT 0,

    institution_logo_blob TEXT,
    institution_logo_mime TEXT,
    certificate_blob TEXT,
    certificate_mime TEXT,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS project_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    detailed_description TEXT,
    technologies TEXT NOT NULL,  -- comma-space-joined list

    category_id INTEGER REFERENCES project_categories(id) ON DELETE SET NULL,
    difficulty_level INTEGER NOT NULL DEFAULT 1,  -- 1-5 scale

    status TEXT NOT NULL DEFAULT 'completed',
    is_deployed INTEGER NOT NULL DEFAULT 0,
    live_url TEXT,
    github_url TEXT,

    client_name TEXT,
    start_date TEXT,
    end_date TEXT,
    featured INTEGER NOT NULL DEFAULT 0,

    -- Case-study narrative
    problem_statement TEXT,
    solution_approach TEXT,
    key_challenges TEXT,
    lessons_learned TEXT,
    results_achieved TEXT,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS project_images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    caption TEXT,
    is_main INTEGER NOT NULL DEFAULT 0,  -- at most one per project

    image_blob TEXT NOT NULL,
    image_mime TEXT NOT NULL,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Many-to-many relationship between projects and skills
CREATE TABLE IF NOT EXISTS project_skills (
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    skill_id INTEGER NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
    relevance_score INTEGER NOT NULL DEFAULT 5,  -- 1-10 scale
    PRIMARY KEY (project_id, skill_id)
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_skills_category ON skills(category);
CREATE INDEX IF NOT EXISTS idx_experiences_start ON work_experiences(start_date);
CREATE INDEX IF NOT EXISTS idx_education_end ON education(end_date);
CREATE INDEX IF NOT EXISTS idx_projects_category ON projects(category_id);
CREATE INDEX IF NOT EXISTS idx_projects_featured ON projects(featured);
CREATE INDEX IF NOT EXISTS idx_images_project ON project_images(project_id);
CREATE INDEX IF NOT EXISTS idx_project_skills_skill ON project_skills(skill_id);
"#;
