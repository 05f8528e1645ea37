//! Employee writes shared by single-record saves and batch ingestion: the
//! create-or-update resolver, core-row writes and wholesale replacement of
//! the four child collections.
//!
//! Everything here runs synchronously on the connection thread and takes a
//! plain `&Connection`, so callers pass an open `Transaction` and own the
//! commit.

use rusqlite::{Connection, OptionalExtension as _, params};
use talenta_core::{
  batch::Resolution,
  employee::{ChildCollections, NewEmployee},
  id::EmployeeId,
};

use crate::encode::{
  EDUCATION_COLUMNS, RawChildren, RawDatedEntry, RawEducation, encode_date,
};

/// Tables holding an employee's child collections.
pub const CHILD_TABLES: [&str; 4] =
  ["education", "work_experience", "certifications", "organization_history"];

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Decide whether `employee` updates an existing row or creates a new one.
///
/// An existing employee matches when its name OR its email equals the
/// candidate's; the lowest key wins. Two different people sharing a full
/// name therefore resolve to the same row.
pub fn resolve_employee(
  conn: &Connection,
  employee: &NewEmployee,
) -> rusqlite::Result<Resolution> {
  let found: Option<i64> = conn
    .query_row(
      "SELECT employee_id FROM employees
       WHERE name = ?1 OR email = ?2
       ORDER BY employee_id
       LIMIT 1",
      params![employee.name, employee.email],
      |row| row.get(0),
    )
    .optional()?;

  Ok(match found {
    Some(id) => Resolution::Update(EmployeeId(id)),
    None => Resolution::Create,
  })
}

// ─── Core row ────────────────────────────────────────────────────────────────

pub fn insert_employee(
  conn: &Connection,
  e: &NewEmployee,
) -> rusqlite::Result<EmployeeId> {
  conn.execute(
    "INSERT INTO employees (
       name, email, birth_date, position, department,
       company_id, level, job_family, talent_mobility
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      e.name,
      e.email,
      e.birth_date.map(encode_date),
      e.position,
      e.department,
      e.company_id.0,
      e.level.as_str(),
      e.job_family,
      e.talent_mobility.as_str(),
    ],
  )?;
  Ok(EmployeeId(conn.last_insert_rowid()))
}

/// Overwrite every core field of `id`. Returns `false` if no such row.
pub fn update_employee_row(
  conn: &Connection,
  id: EmployeeId,
  e: &NewEmployee,
) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "UPDATE employees SET
       name = ?1, email = ?2, birth_date = ?3, position = ?4,
       department = ?5, company_id = ?6, level = ?7, job_family = ?8,
       talent_mobility = ?9
     WHERE employee_id = ?10",
    params![
      e.name,
      e.email,
      e.birth_date.map(encode_date),
      e.position,
      e.department,
      e.company_id.0,
      e.level.as_str(),
      e.job_family,
      e.talent_mobility.as_str(),
      id.0,
    ],
  )?;
  Ok(changed > 0)
}

// ─── Child collections ───────────────────────────────────────────────────────

pub fn delete_children(conn: &Connection, id: EmployeeId) -> rusqlite::Result<()> {
  for table in CHILD_TABLES {
    conn.execute(&format!("DELETE FROM {table} WHERE employee_id = ?1"), [id.0])?;
  }
  Ok(())
}

/// Delete every child row of `id`, then insert `children` in their place.
///
/// Replacing with the same input twice leaves the same contents.
pub fn replace_children(
  conn: &Connection,
  id: EmployeeId,
  children: &ChildCollections,
) -> rusqlite::Result<()> {
  delete_children(conn, id)?;

  let mut stmt = conn.prepare_cached(
    "INSERT INTO education (
       employee_id, institution, level, major, entry_year, graduation_year
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  for ed in &children.education {
    stmt.execute(params![
      id.0,
      ed.institution,
      ed.level.as_str(),
      ed.major,
      ed.entry_year,
      ed.graduation_year,
    ])?;
  }

  let mut stmt = conn.prepare_cached(
    "INSERT INTO work_experience (
       employee_id, company, position, start_date, end_date, description
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  for w in &children.work_experience {
    stmt.execute(params![
      id.0,
      w.company,
      w.position,
      w.start_date.map(encode_date),
      w.end_date.map(encode_date),
      w.description,
    ])?;
  }

  let mut stmt = conn.prepare_cached(
    "INSERT INTO certifications (
       employee_id, name, issuer, issue_date, expiry_date, description
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  for c in &children.certifications {
    stmt.execute(params![
      id.0,
      c.name,
      c.issuer,
      c.issue_date.map(encode_date),
      c.expiry_date.map(encode_date),
      c.description,
    ])?;
  }

  let mut stmt = conn.prepare_cached(
    "INSERT INTO organization_history (
       employee_id, organization, position, start_date, end_date, description
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  for o in &children.organization_history {
    stmt.execute(params![
      id.0,
      o.organization,
      o.position,
      o.start_date.map(encode_date),
      o.end_date.map(encode_date),
      o.description,
    ])?;
  }

  Ok(())
}

pub fn load_education(
  conn: &Connection,
  id: EmployeeId,
) -> rusqlite::Result<Vec<RawEducation>> {
  let mut stmt = conn.prepare_cached(&format!(
    "SELECT {EDUCATION_COLUMNS} FROM education
     WHERE employee_id = ?1 ORDER BY education_id"
  ))?;
  let rows = stmt
    .query_map([id.0], RawEducation::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn load_dated(
  conn: &Connection,
  sql: &str,
  id: EmployeeId,
) -> rusqlite::Result<Vec<RawDatedEntry>> {
  let mut stmt = conn.prepare_cached(sql)?;
  let rows = stmt
    .query_map([id.0], RawDatedEntry::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn load_children(conn: &Connection, id: EmployeeId) -> rusqlite::Result<RawChildren> {
  Ok(RawChildren {
    education:            load_education(conn, id)?,
    work_experience:      load_dated(
      conn,
      "SELECT company, position, start_date, end_date, description
       FROM work_experience WHERE employee_id = ?1 ORDER BY work_experience_id",
      id,
    )?,
    certifications:       load_dated(
      conn,
      "SELECT name, issuer, issue_date, expiry_date, description
       FROM certifications WHERE employee_id = ?1 ORDER BY certification_id",
      id,
    )?,
    organization_history: load_dated(
      conn,
      "SELECT organization, position, start_date, end_date, description
       FROM organization_history WHERE employee_id = ?1
       ORDER BY organization_history_id",
      id,
    )?,
  })
}
