//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `%Y-%m-%d`, timestamps as RFC 3339 strings and
//! enumerations as their display labels (`"BOD-3"`, `"Dalam Review"`, ...).

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use talenta_core::{
  application::{
    Application, ApplicationDetail, Candidacy, CompletedApplication,
    CompletedApplicationDetail,
  },
  company::Company,
  employee::{
    Certification, ChildCollections, Education, Employee, OrganizationHistory,
    WorkExperience,
  },
  id::{
    ApplicationId, CompanyId, CompletedApplicationId, EmployeeId, JobId, UserId,
  },
  job::Job,
  user::User,
};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Fixed-width UTC stamps (`2024-01-15T08:30:00.000000Z`), so text order
/// matches time order.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── Labels ──────────────────────────────────────────────────────────────────

/// Parse a stored enumeration label.
fn decode_label<T: FromStr>(kind: &'static str, value: String) -> Result<T> {
  T::from_str(&value)
    .map_err(|_| talenta_core::Error::UnknownValue { kind, value }.into())
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` type holds the columns exactly as SQLite returns them; decoding
// into domain types happens outside the connection thread.

pub const COMPANY_COLUMNS: &str = "company_id, name, description, is_parent";

pub struct RawCompany {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
  pub is_parent:   bool,
}

impl RawCompany {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      is_parent:   row.get(3)?,
    })
  }

  pub fn into_company(self) -> Company {
    Company {
      id:          CompanyId(self.id),
      name:        self.name,
      description: self.description,
      is_parent:   self.is_parent,
    }
  }
}

/// Employee columns, aliased `e`, always selected first.
pub const EMPLOYEE_COLUMNS: &str = "e.employee_id, e.name, e.email, \
  e.birth_date, e.position, e.department, e.company_id, e.level, \
  e.job_family, e.talent_mobility";

pub struct RawEmployee {
  pub id:              i64,
  pub name:            String,
  pub email:           String,
  pub birth_date:      Option<String>,
  pub position:        String,
  pub department:      String,
  pub company_id:      i64,
  pub level:           String,
  pub job_family:      String,
  pub talent_mobility: String,
}

impl RawEmployee {
  /// Reads columns `0..10` laid out as [`EMPLOYEE_COLUMNS`].
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      birth_date:      row.get(3)?,
      position:        row.get(4)?,
      department:      row.get(5)?,
      company_id:      row.get(6)?,
      level:           row.get(7)?,
      job_family:      row.get(8)?,
      talent_mobility: row.get(9)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      id:              EmployeeId(self.id),
      name:            self.name,
      email:           self.email,
      birth_date:      decode_opt_date(self.birth_date)?,
      position:        self.position,
      department:      self.department,
      company_id:      CompanyId(self.company_id),
      level:           decode_label("level", self.level)?,
      job_family:      self.job_family,
      talent_mobility: decode_label("talent mobility", self.talent_mobility)?,
    })
  }
}

/// Job columns, aliased `j`, always selected first.
pub const JOB_COLUMNS: &str = "j.job_id, j.title, j.department, j.location, \
  j.description, j.company_id, j.posting_date, j.expiration_date, \
  j.job_type, j.qualification, j.level, j.job_family, j.duration_months, \
  j.placement_location";

pub struct RawJob {
  pub id:                 i64,
  pub title:              String,
  pub department:         String,
  pub location:           String,
  pub description:        String,
  pub company_id:         i64,
  pub posting_date:       String,
  pub expiration_date:    String,
  pub job_type:           String,
  pub qualification:      String,
  pub level:              String,
  pub job_family:         String,
  pub duration_months:    i32,
  pub placement_location: String,
}

impl RawJob {
  /// Reads columns `0..14` laid out as [`JOB_COLUMNS`].
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      title:              row.get(1)?,
      department:         row.get(2)?,
      location:           row.get(3)?,
      description:        row.get(4)?,
      company_id:         row.get(5)?,
      posting_date:       row.get(6)?,
      expiration_date:    row.get(7)?,
      job_type:           row.get(8)?,
      qualification:      row.get(9)?,
      level:              row.get(10)?,
      job_family:         row.get(11)?,
      duration_months:    row.get(12)?,
      placement_location: row.get(13)?,
    })
  }

  pub fn into_job(self) -> Result<Job> {
    Ok(Job {
      id:                 JobId(self.id),
      title:              self.title,
      department:         self.department,
      location:           self.location,
      description:        self.description,
      company_id:         CompanyId(self.company_id),
      posting_date:       decode_date(&self.posting_date)?,
      expiration_date:    decode_date(&self.expiration_date)?,
      job_type:           self.job_type,
      qualification:      self.qualification,
      level:              self.level,
      job_family:         self.job_family,
      duration_months:    self.duration_months,
      placement_location: self.placement_location,
    })
  }
}

// ─── Child rows ──────────────────────────────────────────────────────────────

pub const EDUCATION_COLUMNS: &str =
  "institution, level, major, entry_year, graduation_year";

pub struct RawEducation {
  pub institution:     String,
  pub level:           String,
  pub major:           String,
  pub entry_year:      Option<i32>,
  pub graduation_year: Option<i32>,
}

impl RawEducation {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      institution:     row.get(0)?,
      level:           row.get(1)?,
      major:           row.get(2)?,
      entry_year:      row.get(3)?,
      graduation_year: row.get(4)?,
    })
  }

  pub fn into_education(self) -> Result<Education> {
    Ok(Education {
      institution:     self.institution,
      level:           decode_label("education level", self.level)?,
      major:           self.major,
      entry_year:      self.entry_year,
      graduation_year: self.graduation_year,
    })
  }
}

/// Shape shared by work experience, certifications and organization
/// history: two text columns, two optional dates and a description.
pub struct RawDatedEntry {
  pub first:       String,
  pub second:      String,
  pub start:       Option<String>,
  pub end:         Option<String>,
  pub description: Option<String>,
}

impl RawDatedEntry {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      first:       row.get(0)?,
      second:      row.get(1)?,
      start:       row.get(2)?,
      end:         row.get(3)?,
      description: row.get(4)?,
    })
  }

  pub fn into_work_experience(self) -> Result<WorkExperience> {
    Ok(WorkExperience {
      company:     self.first,
      position:    self.second,
      start_date:  decode_opt_date(self.start)?,
      end_date:    decode_opt_date(self.end)?,
      description: self.description,
    })
  }

  pub fn into_certification(self) -> Result<Certification> {
    Ok(Certification {
      name:        self.first,
      issuer:      self.second,
      issue_date:  decode_opt_date(self.start)?,
      expiry_date: decode_opt_date(self.end)?,
      description: self.description,
    })
  }

  pub fn into_organization_history(self) -> Result<OrganizationHistory> {
    Ok(OrganizationHistory {
      organization: self.first,
      position:     self.second,
      start_date:   decode_opt_date(self.start)?,
      end_date:     decode_opt_date(self.end)?,
      description:  self.description,
    })
  }
}

/// All four collections of one employee as read from the database.
#[derive(Default)]
pub struct RawChildren {
  pub education:            Vec<RawEducation>,
  pub work_experience:      Vec<RawDatedEntry>,
  pub certifications:       Vec<RawDatedEntry>,
  pub organization_history: Vec<RawDatedEntry>,
}

impl RawChildren {
  pub fn into_children(self) -> Result<ChildCollections> {
    Ok(ChildCollections {
      education:            self
        .education
        .into_iter()
        .map(RawEducation::into_education)
        .collect::<Result<_>>()?,
      work_experience:      self
        .work_experience
        .into_iter()
        .map(RawDatedEntry::into_work_experience)
        .collect::<Result<_>>()?,
      certifications:       self
        .certifications
        .into_iter()
        .map(RawDatedEntry::into_certification)
        .collect::<Result<_>>()?,
      organization_history: self
        .organization_history
        .into_iter()
        .map(RawDatedEntry::into_organization_history)
        .collect::<Result<_>>()?,
    })
  }
}

// ─── Applications ────────────────────────────────────────────────────────────

/// Joins shared by live and completed application reads. `x` is the
/// application table alias.
pub const CANDIDACY_JOINS: &str = "
  JOIN employees e  ON e.employee_id = x.employee_id
  JOIN companies ec ON ec.company_id = e.company_id
  JOIN jobs      j  ON j.job_id      = x.job_id
  JOIN companies jc ON jc.company_id = j.company_id";

pub const CANDIDACY_COLUMNS: &str = "e.name, e.position, e.level, \
  e.company_id, ec.name, j.title, j.level, j.job_family, \
  j.placement_location, j.company_id, jc.name";

pub struct RawCandidacy {
  pub employee_name:       String,
  pub employee_position:   String,
  pub employee_level:      String,
  pub source_company_id:   i64,
  pub source_company_name: String,
  pub job_title:           String,
  pub job_level:           String,
  pub job_family:          String,
  pub job_location:        String,
  pub target_company_id:   i64,
  pub target_company_name: String,
}

impl RawCandidacy {
  /// Reads [`CANDIDACY_COLUMNS`] starting at column `at`.
  pub fn read(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      employee_name:       row.get(at)?,
      employee_position:   row.get(at + 1)?,
      employee_level:      row.get(at + 2)?,
      source_company_id:   row.get(at + 3)?,
      source_company_name: row.get(at + 4)?,
      job_title:           row.get(at + 5)?,
      job_level:           row.get(at + 6)?,
      job_family:          row.get(at + 7)?,
      job_location:        row.get(at + 8)?,
      target_company_id:   row.get(at + 9)?,
      target_company_name: row.get(at + 10)?,
    })
  }

  pub fn into_candidacy(self) -> Result<Candidacy> {
    Ok(Candidacy {
      employee_name:       self.employee_name,
      employee_position:   self.employee_position,
      employee_level:      decode_label("level", self.employee_level)?,
      source_company_id:   CompanyId(self.source_company_id),
      source_company_name: self.source_company_name,
      job_title:           self.job_title,
      job_level:           self.job_level,
      job_family:          self.job_family,
      job_location:        self.job_location,
      target_company_id:   CompanyId(self.target_company_id),
      target_company_name: self.target_company_name,
    })
  }
}

pub const APPLICATION_COLUMNS: &str =
  "x.application_id, x.employee_id, x.job_id, x.status, x.applied_at";

pub struct RawApplication {
  pub id:          i64,
  pub employee_id: i64,
  pub job_id:      i64,
  pub status:      String,
  pub applied_at:  String,
}

impl RawApplication {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      employee_id: row.get(1)?,
      job_id:      row.get(2)?,
      status:      row.get(3)?,
      applied_at:  row.get(4)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      id:          ApplicationId(self.id),
      employee_id: EmployeeId(self.employee_id),
      job_id:      JobId(self.job_id),
      status:      decode_label("application status", self.status)?,
      applied_at:  decode_dt(&self.applied_at)?,
    })
  }
}

pub struct RawApplicationDetail {
  pub application: RawApplication,
  pub candidacy:   RawCandidacy,
}

impl RawApplicationDetail {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application: RawApplication::read(row)?,
      candidacy:   RawCandidacy::read(row, 5)?,
    })
  }

  pub fn into_detail(self) -> Result<ApplicationDetail> {
    Ok(ApplicationDetail {
      application: self.application.into_application()?,
      candidacy:   self.candidacy.into_candidacy()?,
    })
  }
}

pub const COMPLETED_COLUMNS: &str = "x.completed_application_id, \
  x.employee_id, x.job_id, x.status, x.applied_at, x.completed_at";

pub struct RawCompleted {
  pub id:           i64,
  pub employee_id:  i64,
  pub job_id:       i64,
  pub status:       String,
  pub applied_at:   String,
  pub completed_at: String,
}

impl RawCompleted {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      employee_id:  row.get(1)?,
      job_id:       row.get(2)?,
      status:       row.get(3)?,
      applied_at:   row.get(4)?,
      completed_at: row.get(5)?,
    })
  }

  pub fn into_completed(self) -> Result<CompletedApplication> {
    Ok(CompletedApplication {
      id:           CompletedApplicationId(self.id),
      employee_id:  EmployeeId(self.employee_id),
      job_id:       JobId(self.job_id),
      status:       self.status,
      applied_at:   decode_dt(&self.applied_at)?,
      completed_at: decode_dt(&self.completed_at)?,
    })
  }
}

pub struct RawCompletedDetail {
  pub completed: RawCompleted,
  pub candidacy: RawCandidacy,
}

impl RawCompletedDetail {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      completed: RawCompleted::read(row)?,
      candidacy: RawCandidacy::read(row, 6)?,
    })
  }

  pub fn into_detail(self) -> Result<CompletedApplicationDetail> {
    Ok(CompletedApplicationDetail {
      completed: self.completed.into_completed()?,
      candidacy: self.candidacy.into_candidacy()?,
    })
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, name, email, role, company_id";

pub struct RawUser {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub role:       String,
  pub company_id: Option<i64>,
}

impl RawUser {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      role:       row.get(3)?,
      company_id: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         UserId(self.id),
      name:       self.name,
      email:      self.email,
      role:       decode_label("role", self.role)?,
      company_id: self.company_id.map(CompanyId),
    })
  }
}
