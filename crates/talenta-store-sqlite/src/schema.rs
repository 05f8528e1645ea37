//! SQL schema for the Talenta SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys carry no `ON DELETE` action: every cascade the portal
/// performs is an explicit statement inside the deleting transaction.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS companies (
    company_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT,
    is_parent   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS employees (
    employee_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    birth_date      TEXT,              -- %Y-%m-%d
    position        TEXT NOT NULL,
    department      TEXT NOT NULL,
    company_id      INTEGER NOT NULL REFERENCES companies(company_id),
    level           TEXT NOT NULL,     -- 'BOD-1' .. 'BOD-5'
    job_family      TEXT NOT NULL,
    talent_mobility TEXT NOT NULL DEFAULT 'No'
);

-- Child collections: replaced wholesale, never updated in place.
CREATE TABLE IF NOT EXISTS education (
    education_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id     INTEGER NOT NULL REFERENCES employees(employee_id),
    institution     TEXT NOT NULL,
    level           TEXT NOT NULL,     -- 'D3' | 'S1' | 'S2' | 'S3'
    major           TEXT NOT NULL,
    entry_year      INTEGER,
    graduation_year INTEGER
);

CREATE TABLE IF NOT EXISTS work_experience (
    work_experience_id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id        INTEGER NOT NULL REFERENCES employees(employee_id),
    company            TEXT NOT NULL,
    position           TEXT NOT NULL,
    start_date         TEXT,
    end_date           TEXT,
    description        TEXT
);

CREATE TABLE IF NOT EXISTS certifications (
    certification_id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id      INTEGER NOT NULL REFERENCES employees(employee_id),
    name             TEXT NOT NULL,
    issuer           TEXT NOT NULL,
    issue_date       TEXT,
    expiry_date      TEXT,
    description      TEXT
);

CREATE TABLE IF NOT EXISTS organization_history (
    organization_history_id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id             INTEGER NOT NULL REFERENCES employees(employee_id),
    organization            TEXT NOT NULL,
    position                TEXT NOT NULL,
    start_date              TEXT,
    end_date                TEXT,
    description             TEXT
);

CREATE TABLE IF NOT EXISTS jobs (
    job_id             INTEGER PRIMARY KEY AUTOINCREMENT,
    title              TEXT NOT NULL,
    department         TEXT NOT NULL,
    location           TEXT NOT NULL,
    description        TEXT NOT NULL,
    company_id         INTEGER NOT NULL REFERENCES companies(company_id),
    posting_date       TEXT NOT NULL,
    expiration_date    TEXT NOT NULL,
    job_type           TEXT NOT NULL,
    qualification      TEXT NOT NULL,
    level              TEXT NOT NULL,
    job_family         TEXT NOT NULL,
    duration_months    INTEGER NOT NULL,
    placement_location TEXT NOT NULL
);

-- Live candidacies. A row moves to completed_applications on completion.
CREATE TABLE IF NOT EXISTS applications (
    application_id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id    INTEGER NOT NULL REFERENCES employees(employee_id),
    job_id         INTEGER NOT NULL REFERENCES jobs(job_id),
    status         TEXT NOT NULL,
    applied_at     TEXT NOT NULL       -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS completed_applications (
    completed_application_id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id              INTEGER NOT NULL REFERENCES employees(employee_id),
    job_id                   INTEGER NOT NULL REFERENCES jobs(job_id),
    status                   TEXT NOT NULL,
    applied_at               TEXT NOT NULL,
    completed_at             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,       -- argon2 PHC string
    role          TEXT NOT NULL,       -- 'superadmin' | 'hrd'
    company_id    INTEGER REFERENCES companies(company_id)
);

-- Append-only login audit.
CREATE TABLE IF NOT EXISTS login_events (
    login_event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL REFERENCES users(user_id),
    logged_in_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS employees_company_idx       ON employees(company_id);
CREATE INDEX IF NOT EXISTS employees_email_idx         ON employees(email);
CREATE INDEX IF NOT EXISTS education_employee_idx      ON education(employee_id);
CREATE INDEX IF NOT EXISTS work_experience_employee_idx ON work_experience(employee_id);
CREATE INDEX IF NOT EXISTS certifications_employee_idx ON certifications(employee_id);
CREATE INDEX IF NOT EXISTS organization_history_employee_idx
    ON organization_history(employee_id);
CREATE INDEX IF NOT EXISTS jobs_company_idx            ON jobs(company_id);
CREATE INDEX IF NOT EXISTS applications_job_idx        ON applications(job_id);
CREATE INDEX IF NOT EXISTS applications_employee_idx   ON applications(employee_id);

PRAGMA user_version = 1;
";
