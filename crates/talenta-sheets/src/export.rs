//! Read-only workbook exports: candidate recap, completed-application report
//! and the full database dump.
//!
//! Callers pass rows they have already scoped; nothing here filters by
//! company.

use chrono::{DateTime, NaiveDate, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use talenta_core::{
  application::{ApplicationDetail, ApplicationStatus, CompletedApplicationDetail},
  company::Company,
  employee::{EducationListing, EmployeeSummary},
  job::JobListing,
  user::User,
};

pub const CANDIDATE_RECAP_SHEET: &str = "Rekap Kandidat";
pub const COMPLETED_REPORT_SHEET: &str = "Completed Applications";

const CANDIDATE_RECAP_HEADERS: &[&str] = &[
  "Nama Kandidat",
  "Posisi Asal",
  "Posisi Dilamar",
  "Perusahaan Asal",
  "Perusahaan Dilamar",
  "Level Jabatan",
  "Rumpun Jabatan",
  "Lokasi Penempatan",
  "Status",
];

const COMPLETED_REPORT_HEADERS: &[&str] = &[
  "Nama Kandidat",
  "Posisi Asal",
  "Posisi Dilamar",
  "Perusahaan Asal",
  "Perusahaan Tujuan",
  "Tanggal Aplikasi",
  "Tanggal Selesai",
  "Status Akhir",
];

// ─── Cell values ─────────────────────────────────────────────────────────────

/// One exported cell.
enum Field {
  Text(String),
  Number(f64),
  Blank,
}

impl From<&str> for Field {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Field {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for Field {
  fn from(n: i64) -> Self { Self::Number(n as f64) }
}

impl<T: Into<Field>> From<Option<T>> for Field {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Blank, Into::into) }
}

fn day(d: NaiveDate) -> String { d.format("%d/%m/%Y").to_string() }

fn timestamp(t: DateTime<Utc>) -> String { t.format("%d/%m/%Y %H:%M").to_string() }

// ─── Sheet helpers ───────────────────────────────────────────────────────────

pub(crate) fn header_format() -> Format { Format::new().set_bold() }

/// Bold headers on row 0, with each column widened to fit its title.
pub(crate) fn write_headers(
  sheet: &mut Worksheet,
  headers: &[&str],
  format: &Format,
) -> Result<(), XlsxError> {
  for (col, header) in (0u16..).zip(headers) {
    sheet.write_string_with_format(0, col, *header, format)?;
    sheet.set_column_width(col, (header.chars().count() + 4).max(14) as f64)?;
  }
  Ok(())
}

fn add_table(
  workbook: &mut Workbook,
  name: &str,
  headers: &[&str],
  rows: impl IntoIterator<Item = Vec<Field>>,
) -> Result<(), XlsxError> {
  let bold = header_format();
  let sheet = workbook.add_worksheet();
  sheet.set_name(name)?;
  write_headers(sheet, headers, &bold)?;

  for (row, fields) in (1u32..).zip(rows) {
    for (col, field) in (0u16..).zip(fields) {
      match field {
        Field::Text(s) => {
          sheet.write_string(row, col, &s)?;
        }
        Field::Number(n) => {
          sheet.write_number(row, col, n)?;
        }
        Field::Blank => {}
      }
    }
  }
  Ok(())
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Recap of live applications, optionally narrowed to one status.
pub fn candidate_recap(
  applications: &[ApplicationDetail],
  status: Option<ApplicationStatus>,
) -> Result<Vec<u8>, XlsxError> {
  let rows = applications
    .iter()
    .filter(|a| status.is_none_or(|s| a.application.status == s))
    .map(|a| -> Vec<Field> {
      let c = &a.candidacy;
      vec![
        c.employee_name.as_str().into(),
        c.employee_position.as_str().into(),
        c.job_title.as_str().into(),
        c.source_company_name.as_str().into(),
        c.target_company_name.as_str().into(),
        c.job_level.as_str().into(),
        c.job_family.as_str().into(),
        c.job_location.as_str().into(),
        a.application.status.as_str().into(),
      ]
    });

  let mut workbook = Workbook::new();
  add_table(&mut workbook, CANDIDATE_RECAP_SHEET, CANDIDATE_RECAP_HEADERS, rows)?;
  workbook.save_to_buffer()
}

pub fn completed_report(completed: &[CompletedApplicationDetail]) -> Result<Vec<u8>, XlsxError> {
  let rows = completed.iter().map(|a| -> Vec<Field> {
    let c = &a.candidacy;
    vec![
      c.employee_name.as_str().into(),
      c.employee_position.as_str().into(),
      c.job_title.as_str().into(),
      c.source_company_name.as_str().into(),
      c.target_company_name.as_str().into(),
      timestamp(a.completed.applied_at).into(),
      timestamp(a.completed.completed_at).into(),
      a.completed.status.as_str().into(),
    ]
  });

  let mut workbook = Workbook::new();
  add_table(&mut workbook, COMPLETED_REPORT_SHEET, COMPLETED_REPORT_HEADERS, rows)?;
  workbook.save_to_buffer()
}

// ─── Database dump ───────────────────────────────────────────────────────────

/// Every table of the store, as read for a full export.
///
/// Users are [`User`] values, which carry no password hash.
#[derive(Debug, Clone, Default)]
pub struct DatabaseDump {
  pub companies:    Vec<Company>,
  pub employees:    Vec<EmployeeSummary>,
  pub education:    Vec<EducationListing>,
  pub jobs:         Vec<JobListing>,
  pub applications: Vec<ApplicationDetail>,
  pub completed:    Vec<CompletedApplicationDetail>,
  pub users:        Vec<User>,
}

pub fn database_dump(dump: &DatabaseDump) -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();

  add_table(
    &mut workbook,
    "Companies",
    &["ID", "Name", "Description", "IsParent"],
    dump.companies.iter().map(|c| -> Vec<Field> {
      vec![
        c.id.0.into(),
        c.name.as_str().into(),
        c.description.as_deref().into(),
        Field::from(if c.is_parent { "Yes" } else { "No" }),
      ]
    }),
  )?;

  add_table(
    &mut workbook,
    "Employees",
    &[
      "ID",
      "Name",
      "Email",
      "BirthDate",
      "Position",
      "Department",
      "CompanyID",
      "CompanyName",
      "Level",
      "RumpunJabatan",
      "TalentMobility",
    ],
    dump.employees.iter().map(|s| -> Vec<Field> {
      let e = &s.employee;
      vec![
        e.id.0.into(),
        e.name.as_str().into(),
        e.email.as_str().into(),
        e.birth_date.map(day).into(),
        e.position.as_str().into(),
        e.department.as_str().into(),
        e.company_id.0.into(),
        s.company_name.as_str().into(),
        e.level.as_str().into(),
        e.job_family.as_str().into(),
        e.talent_mobility.as_str().into(),
      ]
    }),
  )?;

  add_table(
    &mut workbook,
    "PendidikanKaryawan",
    &[
      "EmployeeID",
      "EmployeeName",
      "NamaInstitut",
      "Jenjang",
      "Jurusan",
      "TahunMasuk",
      "TahunAkhir",
    ],
    dump.education.iter().map(|l| -> Vec<Field> {
      let e = &l.education;
      vec![
        l.employee_id.0.into(),
        l.employee_name.as_str().into(),
        e.institution.as_str().into(),
        e.level.as_str().into(),
        e.major.as_str().into(),
        e.entry_year.map(i64::from).into(),
        e.graduation_year.map(i64::from).into(),
      ]
    }),
  )?;

  add_table(
    &mut workbook,
    "Jobs",
    &[
      "ID",
      "Title",
      "Department",
      "Location",
      "CompanyID",
      "CompanyName",
      "PostingDate",
      "ExpirationDate",
      "JobType",
      "Level",
      "RumpunJabatan",
      "DurationMonths",
      "PlacementLocation",
    ],
    dump.jobs.iter().map(|l| -> Vec<Field> {
      let j = &l.job;
      vec![
        j.id.0.into(),
        j.title.as_str().into(),
        j.department.as_str().into(),
        j.location.as_str().into(),
        j.company_id.0.into(),
        l.company_name.as_str().into(),
        day(j.posting_date).into(),
        day(j.expiration_date).into(),
        j.job_type.as_str().into(),
        j.level.as_str().into(),
        j.job_family.as_str().into(),
        i64::from(j.duration_months).into(),
        j.placement_location.as_str().into(),
      ]
    }),
  )?;

  add_table(
    &mut workbook,
    "Applications",
    &[
      "ID",
      "EmployeeID",
      "EmployeeName",
      "JobID",
      "JobTitle",
      "Status",
      "AppliedAt",
      "SourceCompany",
      "TargetCompany",
    ],
    dump.applications.iter().map(|a| -> Vec<Field> {
      let (x, c) = (&a.application, &a.candidacy);
      vec![
        x.id.0.into(),
        x.employee_id.0.into(),
        c.employee_name.as_str().into(),
        x.job_id.0.into(),
        c.job_title.as_str().into(),
        x.status.as_str().into(),
        timestamp(x.applied_at).into(),
        c.source_company_name.as_str().into(),
        c.target_company_name.as_str().into(),
      ]
    }),
  )?;

  add_table(
    &mut workbook,
    "CompletedApplications",
    &[
      "ID",
      "EmployeeID",
      "EmployeeName",
      "JobID",
      "JobTitle",
      "Status",
      "AppliedAt",
      "CompletedAt",
      "SourceCompany",
      "TargetCompany",
    ],
    dump.completed.iter().map(|a| -> Vec<Field> {
      let (x, c) = (&a.completed, &a.candidacy);
      vec![
        x.id.0.into(),
        x.employee_id.0.into(),
        c.employee_name.as_str().into(),
        x.job_id.0.into(),
        c.job_title.as_str().into(),
        x.status.as_str().into(),
        timestamp(x.applied_at).into(),
        timestamp(x.completed_at).into(),
        c.source_company_name.as_str().into(),
        c.target_company_name.as_str().into(),
      ]
    }),
  )?;

  add_table(
    &mut workbook,
    "Users",
    &["ID", "Name", "Email", "Role", "CompanyID"],
    dump.users.iter().map(|u| -> Vec<Field> {
      vec![
        u.id.0.into(),
        u.name.as_str().into(),
        u.email.as_str().into(),
        u.role.as_str().into(),
        u.company_id.map(|c| c.0).into(),
      ]
    }),
  )?;

  tracing::info!(
    companies = dump.companies.len(),
    employees = dump.employees.len(),
    applications = dump.applications.len(),
    completed = dump.completed.len(),
    users = dump.users.len(),
    "database dump written"
  );
  workbook.save_to_buffer()
}
