//! [`SqliteStore`], the SQLite implementation of [`PortalStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::{Connection, OptionalExtension as _, params};
use talenta_core::{
  application::{
    Application, ApplicationDetail, ApplicationStatus, COMPLETED_STATUS,
    CompletedApplication, CompletedApplicationDetail, MobilityCandidate,
    NewApplication,
  },
  batch::{BatchEmployee, Resolution, UpsertReport},
  company::{Company, NewCompany},
  employee::{
    ChildCollections, EducationListing, Employee, EmployeeProfile, EmployeeRecord,
    EmployeeSummary, TalentMobility,
  },
  id::{ApplicationId, CompanyId, CompletedApplicationId, EmployeeId, JobId, UserId},
  job::{Job, JobListing, NewJob},
  scope::Scope,
  store::PortalStore,
  user::{NewUser, User, UserCredentials},
};

use crate::{
  Error, Result,
  cascade::{
    delete_children, insert_employee, load_children, load_education,
    replace_children, resolve_employee, update_employee_row,
  },
  encode::{
    APPLICATION_COLUMNS, CANDIDACY_COLUMNS, CANDIDACY_JOINS, COMPANY_COLUMNS,
    COMPLETED_COLUMNS, EMPLOYEE_COLUMNS, JOB_COLUMNS, RawApplication,
    RawApplicationDetail, RawCompany, RawCompleted, RawCompletedDetail,
    RawEducation, RawEmployee, RawJob, RawUser, USER_COLUMNS, encode_date,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Talenta portal store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Query helpers ───────────────────────────────────────────────────────────
//
// Synchronous building blocks run inside `Connection::call`. Scoped listings
// bind the company filter as `?1`; `NULL` means unrestricted.

fn row_exists(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<bool> {
  Ok(conn.query_row(sql, [id], |_| Ok(())).optional()?.is_some())
}

/// `Err(CompanyNotFound)` in the inner result unless `company` exists.
fn known_company(
  conn: &Connection,
  company: CompanyId,
) -> rusqlite::Result<std::result::Result<(), talenta_core::Error>> {
  let found =
    row_exists(conn, "SELECT 1 FROM companies WHERE company_id = ?1", company.0)?;
  Ok(if found { Ok(()) } else { Err(talenta_core::Error::CompanyNotFound(company)) })
}

fn select_employees<P: rusqlite::Params>(
  conn: &Connection,
  filter: &str,
  params: P,
) -> rusqlite::Result<Vec<(RawEmployee, String)>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {EMPLOYEE_COLUMNS}, c.name
     FROM employees e
     JOIN companies c ON c.company_id = e.company_id
     WHERE {filter}
     ORDER BY e.name, e.employee_id"
  ))?;
  let rows = stmt
    .query_map(params, |row| Ok((RawEmployee::read(row)?, row.get(10)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn select_jobs<P: rusqlite::Params>(
  conn: &Connection,
  filter: &str,
  params: P,
) -> rusqlite::Result<Vec<(RawJob, String)>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {JOB_COLUMNS}, c.name
     FROM jobs j
     JOIN companies c ON c.company_id = j.company_id
     WHERE {filter}
     ORDER BY j.posting_date DESC, j.job_id DESC"
  ))?;
  let rows = stmt
    .query_map(params, |row| Ok((RawJob::read(row)?, row.get(14)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn select_applications<P: rusqlite::Params>(
  conn: &Connection,
  filter: &str,
  params: P,
) -> rusqlite::Result<Vec<RawApplicationDetail>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {APPLICATION_COLUMNS}, {CANDIDACY_COLUMNS}
     FROM applications x {CANDIDACY_JOINS}
     WHERE {filter}
     ORDER BY x.applied_at DESC, x.application_id DESC"
  ))?;
  let rows = stmt
    .query_map(params, RawApplicationDetail::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn select_completed<P: rusqlite::Params>(
  conn: &Connection,
  filter: &str,
  params: P,
) -> rusqlite::Result<Vec<RawCompletedDetail>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {COMPLETED_COLUMNS}, {CANDIDACY_COLUMNS}
     FROM completed_applications x {CANDIDACY_JOINS}
     WHERE {filter}
     ORDER BY x.completed_at DESC, x.completed_application_id DESC"
  ))?;
  let rows = stmt
    .query_map(params, RawCompletedDetail::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn into_listing((raw, company_name): (RawJob, String)) -> Result<JobListing> {
  Ok(JobListing { job: raw.into_job()?, company_name })
}

/// Outcome of a guarded job deletion.
enum JobDeletion {
  Missing,
  InUse(usize),
  Deleted,
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  type Error = Error;

  // ── Companies ─────────────────────────────────────────────────────────────

  async fn add_company(&self, input: NewCompany) -> Result<Company> {
    let name = input.name.clone();
    let description = input.description.clone();
    let is_parent = input.is_parent;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row("SELECT 1 FROM companies WHERE name = ?1", [&name], |_| Ok(()))
          .optional()?
          .is_some();
        if taken {
          return Ok(Err(talenta_core::Error::DuplicateCompany(name)));
        }
        tx.execute(
          "INSERT INTO companies (name, description, is_parent) VALUES (?1, ?2, ?3)",
          params![name, description, is_parent],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    Ok(Company {
      id:          CompanyId(id),
      name:        input.name,
      description: input.description,
      is_parent:   input.is_parent,
    })
  }

  async fn get_company(&self, id: CompanyId) -> Result<Option<Company>> {
    let raw: Option<RawCompany> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = ?1"),
            [id.0],
            RawCompany::read,
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawCompany::into_company))
  }

  async fn list_companies(&self) -> Result<Vec<Company>> {
    let raws: Vec<RawCompany> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY company_id"
        ))?;
        let rows = stmt
          .query_map([], RawCompany::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCompany::into_company).collect())
  }

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn list_employees(&self, scope: Scope) -> Result<Vec<EmployeeSummary>> {
    let Some(filter) = scope.company_filter() else {
      return Ok(Vec::new());
    };
    let company = filter.map(|c| c.0);

    let raws = self
      .conn
      .call(move |conn| {
        let rows =
          select_employees(conn, "(?1 IS NULL OR e.company_id = ?1)", [company])?;
        let mut out = Vec::with_capacity(rows.len());
        for (employee, company_name) in rows {
          let education = load_education(conn, EmployeeId(employee.id))?;
          out.push((employee, company_name, education));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(employee, company_name, education)| {
        Ok(EmployeeSummary {
          employee: employee.into_employee()?,
          company_name,
          education: education
            .into_iter()
            .map(RawEducation::into_education)
            .collect::<Result<_>>()?,
        })
      })
      .collect()
  }

  async fn get_employee(&self, id: EmployeeId) -> Result<Option<EmployeeProfile>> {
    let raw = self
      .conn
      .call(move |conn| {
        let Some((employee, company_name)) =
          select_employees(conn, "e.employee_id = ?1", [id.0])?.pop()
        else {
          return Ok(None);
        };
        let children = load_children(conn, id)?;
        Ok(Some((employee, company_name, children)))
      })
      .await?;

    raw
      .map(|(employee, company_name, children)| {
        Ok(EmployeeProfile {
          employee: employee.into_employee()?,
          company_name,
          children: children.into_children()?,
        })
      })
      .transpose()
  }

  async fn add_employee(&self, record: EmployeeRecord) -> Result<Employee> {
    let employee = record.employee.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Err(e) = known_company(&tx, record.employee.company_id)? {
          return Ok(Err(e));
        }
        let id = insert_employee(&tx, &record.employee)?;
        replace_children(&tx, id, &record.children)?;
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    tracing::info!(employee = %id, "employee created");
    Ok(employee.with_id(id))
  }

  async fn update_employee(
    &self,
    id: EmployeeId,
    record: EmployeeRecord,
  ) -> Result<Employee> {
    let employee = record.employee.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Err(e) = known_company(&tx, record.employee.company_id)? {
          return Ok(Err(e));
        }
        if !update_employee_row(&tx, id, &record.employee)? {
          return Ok(Err(talenta_core::Error::EmployeeNotFound(id)));
        }
        replace_children(&tx, id, &record.children)?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await??;

    Ok(employee.with_id(id))
  }

  async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM applications WHERE employee_id = ?1", [id.0])?;
        tx.execute(
          "DELETE FROM completed_applications WHERE employee_id = ?1",
          [id.0],
        )?;
        delete_children(&tx, id)?;
        let removed =
          tx.execute("DELETE FROM employees WHERE employee_id = ?1", [id.0])?;
        if removed == 0 {
          return Ok(false);
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(talenta_core::Error::EmployeeNotFound(id).into());
    }
    tracing::info!(employee = %id, "employee deleted");
    Ok(())
  }

  async fn upsert_employees(&self, batch: Vec<BatchEmployee>) -> Result<UpsertReport> {
    let intended = batch.len();
    let children = |pick: fn(&ChildCollections) -> usize| -> usize {
      batch.iter().map(|item| pick(&item.record.children)).sum()
    };
    tracing::info!(
      employees = intended,
      education = children(|c| c.education.len()),
      work_experience = children(|c| c.work_experience.len()),
      certifications = children(|c| c.certifications.len()),
      organization_history = children(|c| c.organization_history.len()),
      "upserting employee batch"
    );

    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = UpsertReport { intended, ..UpsertReport::default() };

        for item in &batch {
          let employee = &item.record.employee;
          let id = match resolve_employee(&tx, employee)? {
            Resolution::Create => {
              report.created += 1;
              insert_employee(&tx, employee)?
            }
            Resolution::Update(id) => {
              report.updated += 1;
              update_employee_row(&tx, id, employee)?;
              id
            }
          };
          replace_children(&tx, id, &item.record.children)?;
        }

        tx.commit()?;
        Ok(report)
      })
      .await;

    match result {
      Ok(report) => {
        tracing::info!(
          created = report.created,
          updated = report.updated,
          "employee batch committed"
        );
        Ok(report)
      }
      Err(e) => {
        tracing::warn!(employees = intended, error = %e, "employee batch rolled back");
        Err(e.into())
      }
    }
  }

  async fn list_mobility_candidates(
    &self,
    company: CompanyId,
  ) -> Result<Vec<MobilityCandidate>> {
    let raws = self
      .conn
      .call(move |conn| {
        let rows = select_employees(
          conn,
          "e.company_id = ?1
           AND (e.talent_mobility = ?2
                OR EXISTS (SELECT 1 FROM applications a
                           WHERE a.employee_id = e.employee_id))",
          params![company.0, TalentMobility::Yes.as_str()],
        )?;
        let mut out = Vec::with_capacity(rows.len());
        for (employee, company_name) in rows {
          let applications =
            select_applications(conn, "x.employee_id = ?1", [employee.id])?;
          out.push((employee, company_name, applications));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(employee, company_name, applications)| {
        Ok(MobilityCandidate {
          employee: employee.into_employee()?,
          company_name,
          applications: applications
            .into_iter()
            .map(RawApplicationDetail::into_detail)
            .collect::<Result<_>>()?,
        })
      })
      .collect()
  }

  async fn list_education(&self) -> Result<Vec<EducationListing>> {
    let raws: Vec<(i64, String, RawEducation)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT ed.employee_id, e.name, ed.institution, ed.level, ed.major,
                  ed.entry_year, ed.graduation_year
           FROM education ed
           JOIN employees e ON e.employee_id = ed.employee_id
           ORDER BY ed.employee_id, ed.education_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, RawEducation {
              institution:     row.get(2)?,
              level:           row.get(3)?,
              major:           row.get(4)?,
              entry_year:      row.get(5)?,
              graduation_year: row.get(6)?,
            }))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(employee_id, employee_name, education)| {
        Ok(EducationListing {
          employee_id: EmployeeId(employee_id),
          employee_name,
          education: education.into_education()?,
        })
      })
      .collect()
  }

  // ── Jobs ──────────────────────────────────────────────────────────────────

  async fn list_jobs(&self, scope: Scope) -> Result<Vec<JobListing>> {
    let Some(filter) = scope.company_filter() else {
      return Ok(Vec::new());
    };
    let company = filter.map(|c| c.0);

    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_jobs(conn, "(?1 IS NULL OR j.company_id = ?1)", [company])?)
      })
      .await?;

    raws.into_iter().map(into_listing).collect()
  }

  async fn get_job(&self, id: JobId) -> Result<Option<JobListing>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_jobs(conn, "j.job_id = ?1", [id.0])?.pop()))
      .await?;

    raw.map(into_listing).transpose()
  }

  async fn add_job(&self, input: NewJob) -> Result<Job> {
    let job = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Err(e) = known_company(&tx, job.company_id)? {
          return Ok(Err(e));
        }
        tx.execute(
          "INSERT INTO jobs (
             title, department, location, description, company_id,
             posting_date, expiration_date, job_type, qualification,
             level, job_family, duration_months, placement_location
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          params![
            job.title,
            job.department,
            job.location,
            job.description,
            job.company_id.0,
            encode_date(job.posting_date),
            encode_date(job.expiration_date),
            job.job_type,
            job.qualification,
            job.level,
            job.job_family,
            job.duration_months,
            job.placement_location,
          ],
        )?;
        let id = JobId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    tracing::info!(job = %id, company = %input.company_id, "job created");
    Ok(input.with_id(id))
  }

  async fn update_job(&self, id: JobId, input: NewJob) -> Result<Job> {
    let job = input.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Err(e) = known_company(&tx, job.company_id)? {
          return Ok(Err(e));
        }
        let changed = tx.execute(
          "UPDATE jobs SET
             title = ?1, department = ?2, location = ?3, description = ?4,
             company_id = ?5, posting_date = ?6, expiration_date = ?7,
             job_type = ?8, qualification = ?9, level = ?10,
             job_family = ?11, duration_months = ?12, placement_location = ?13
           WHERE job_id = ?14",
          params![
            job.title,
            job.department,
            job.location,
            job.description,
            job.company_id.0,
            encode_date(job.posting_date),
            encode_date(job.expiration_date),
            job.job_type,
            job.qualification,
            job.level,
            job.job_family,
            job.duration_months,
            job.placement_location,
            id.0,
          ],
        )?;
        if changed == 0 {
          return Ok(Err(talenta_core::Error::JobNotFound(id)));
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await??;

    Ok(input.with_id(id))
  }

  async fn delete_job(&self, id: JobId) -> Result<()> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !row_exists(&tx, "SELECT 1 FROM jobs WHERE job_id = ?1", id.0)? {
          return Ok(JobDeletion::Missing);
        }
        let referencing: i64 = tx.query_row(
          "SELECT (SELECT COUNT(*) FROM applications WHERE job_id = ?1)
                + (SELECT COUNT(*) FROM completed_applications WHERE job_id = ?1)",
          [id.0],
          |row| row.get(0),
        )?;
        if referencing > 0 {
          return Ok(JobDeletion::InUse(referencing as usize));
        }
        tx.execute("DELETE FROM jobs WHERE job_id = ?1", [id.0])?;
        tx.commit()?;
        Ok(JobDeletion::Deleted)
      })
      .await?;

    match outcome {
      JobDeletion::Missing => Err(talenta_core::Error::JobNotFound(id).into()),
      JobDeletion::InUse(applications) => {
        Err(talenta_core::Error::JobInUse { job_id: id, applications }.into())
      }
      JobDeletion::Deleted => {
        tracing::info!(job = %id, "job deleted");
        Ok(())
      }
    }
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn list_applications(&self, scope: Scope) -> Result<Vec<ApplicationDetail>> {
    let Some(filter) = scope.company_filter() else {
      return Ok(Vec::new());
    };
    let company = filter.map(|c| c.0);

    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_applications(
          conn,
          "(?1 IS NULL OR j.company_id = ?1)",
          [company],
        )?)
      })
      .await?;

    raws.into_iter().map(RawApplicationDetail::into_detail).collect()
  }

  async fn list_outgoing_applications(
    &self,
    company: CompanyId,
  ) -> Result<Vec<ApplicationDetail>> {
    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_applications(conn, "e.company_id = ?1", [company.0])?)
      })
      .await?;

    raws.into_iter().map(RawApplicationDetail::into_detail).collect()
  }

  async fn get_application(&self, id: ApplicationId) -> Result<Option<ApplicationDetail>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_applications(conn, "x.application_id = ?1", [id.0])?.pop())
      })
      .await?;

    raw.map(RawApplicationDetail::into_detail).transpose()
  }

  async fn add_application(&self, input: NewApplication) -> Result<Application> {
    // Stored at microsecond precision; return what a later read will see.
    let applied_at = input.applied_at.unwrap_or_else(Utc::now).trunc_subsecs(6);
    let applied_at_str = encode_dt(applied_at);
    let NewApplication { employee_id, job_id, status, .. } = input;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !row_exists(
          &tx,
          "SELECT 1 FROM employees WHERE employee_id = ?1",
          employee_id.0,
        )? {
          return Ok(Err(talenta_core::Error::EmployeeNotFound(employee_id)));
        }
        if !row_exists(&tx, "SELECT 1 FROM jobs WHERE job_id = ?1", job_id.0)? {
          return Ok(Err(talenta_core::Error::JobNotFound(job_id)));
        }

        tx.execute(
          "INSERT INTO applications (employee_id, job_id, status, applied_at)
           VALUES (?1, ?2, ?3, ?4)",
          params![employee_id.0, job_id.0, status.as_str(), applied_at_str],
        )?;
        let id = ApplicationId(tx.last_insert_rowid());
        tx.execute(
          "UPDATE employees SET talent_mobility = ?1 WHERE employee_id = ?2",
          params![TalentMobility::Yes.as_str(), employee_id.0],
        )?;
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    tracing::info!(application = %id, employee = %employee_id, job = %job_id, "application created");
    Ok(Application { id, employee_id, job_id, status, applied_at })
  }

  async fn update_application_status(
    &self,
    id: ApplicationId,
    status: ApplicationStatus,
  ) -> Result<Application> {
    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE applications SET status = ?1 WHERE application_id = ?2",
          params![status.as_str(), id.0],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications x
             WHERE x.application_id = ?1"
          ),
          [id.0],
          RawApplication::read,
        )?))
      })
      .await?;

    raw
      .ok_or(talenta_core::Error::ApplicationNotFound(id))?
      .into_application()
  }

  async fn delete_application(&self, id: ApplicationId) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM applications WHERE application_id = ?1", [id.0])?)
      })
      .await?;

    if removed == 0 {
      return Err(talenta_core::Error::ApplicationNotFound(id).into());
    }
    Ok(())
  }

  async fn complete_application(&self, id: ApplicationId) -> Result<CompletedApplication> {
    let completed_at = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(live) = tx
          .query_row(
            &format!(
              "SELECT {APPLICATION_COLUMNS} FROM applications x
               WHERE x.application_id = ?1"
            ),
            [id.0],
            RawApplication::read,
          )
          .optional()?
        else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO completed_applications (
             employee_id, job_id, status, applied_at, completed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            live.employee_id,
            live.job_id,
            COMPLETED_STATUS,
            live.applied_at,
            completed_at,
          ],
        )?;
        let completed_id = tx.last_insert_rowid();
        tx.execute("DELETE FROM applications WHERE application_id = ?1", [id.0])?;
        tx.commit()?;

        Ok(Some(RawCompleted {
          id: completed_id,
          employee_id: live.employee_id,
          job_id: live.job_id,
          status: COMPLETED_STATUS.to_owned(),
          applied_at: live.applied_at,
          completed_at,
        }))
      })
      .await?;

    let completed = raw
      .ok_or(talenta_core::Error::ApplicationNotFound(id))?
      .into_completed()?;
    tracing::info!(application = %id, completed = %completed.id, "application completed");
    Ok(completed)
  }

  // ── Completed applications ────────────────────────────────────────────────

  async fn list_completed_applications(
    &self,
    scope: Scope,
  ) -> Result<Vec<CompletedApplicationDetail>> {
    let Some(filter) = scope.company_filter() else {
      return Ok(Vec::new());
    };
    let company = filter.map(|c| c.0);

    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_completed(
          conn,
          "(?1 IS NULL OR e.company_id = ?1 OR j.company_id = ?1)",
          [company],
        )?)
      })
      .await?;

    raws.into_iter().map(RawCompletedDetail::into_detail).collect()
  }

  async fn get_completed_application(
    &self,
    id: CompletedApplicationId,
  ) -> Result<Option<CompletedApplicationDetail>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_completed(conn, "x.completed_application_id = ?1", [id.0])?.pop())
      })
      .await?;

    raw.map(RawCompletedDetail::into_detail).transpose()
  }

  async fn delete_completed_application(&self, id: CompletedApplicationId) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM completed_applications WHERE completed_application_id = ?1",
          [id.0],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(talenta_core::Error::CompletedApplicationNotFound(id).into());
    }
    Ok(())
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let NewUser { name, email, password_hash, role, company_id } = input;
    let (n, e) = (name.clone(), email.clone());

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row("SELECT 1 FROM users WHERE email = ?1", [&e], |_| Ok(()))
          .optional()?
          .is_some();
        if taken {
          return Ok(Err(talenta_core::Error::DuplicateEmail(e)));
        }
        tx.execute(
          "INSERT INTO users (name, email, password_hash, role, company_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![n, e, password_hash, role.as_str(), company_id.map(|c| c.0)],
        )?;
        let id = UserId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Ok(id))
      })
      .await??;

    tracing::info!(user = %id, role = role.as_str(), "user created");
    Ok(User { id, name, email, role, company_id })
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            [id.0],
            RawUser::read,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id"))?;
        let rows = stmt
          .query_map([], RawUser::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<UserCredentials>> {
    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
            [email],
            |row| Ok((RawUser::read(row)?, row.get(5)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(user, password_hash)| {
        Ok(UserCredentials { user: user.into_user()?, password_hash })
      })
      .transpose()
  }

  async fn set_password_hash(&self, id: UserId, password_hash: String) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET password_hash = ?1 WHERE user_id = ?2",
          params![password_hash, id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(talenta_core::Error::UserNotFound(id).into());
    }
    tracing::info!(user = %id, "password reset");
    Ok(())
  }

  async fn record_login(&self, id: UserId) -> Result<()> {
    let at = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO login_events (user_id, logged_in_at) VALUES (?1, ?2)",
          params![id.0, at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
