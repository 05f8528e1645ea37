//! End-to-end tests: real xlsx bytes through the pipeline into a SQLite
//! store, plus template and export read-back.

use std::io::Cursor;

use calamine::Reader as _;
use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook};
use talenta_core::{
  application::{ApplicationStatus, NewApplication},
  company::NewCompany,
  employee::EmployeeSummary,
  id::{CompanyId, UserId},
  job::NewJob,
  scope::Scope,
  store::PortalStore,
  user::{Caller, NewUser, Role},
};
use talenta_store_sqlite::SqliteStore;

use crate::{
  IngestError, ValidationError,
  export::{self, DatabaseDump},
  import_workbook, read_workbook,
  schema::{self, SheetSchema},
  template::write_template,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.expect("in-memory store");
  for name in [
    "PT Bahana Pembinaan Usaha Indonesia (Persero)",
    "PT Asuransi Kerugian Jasa Raharja",
    "PT Jaminan Kredit Indonesia",
  ] {
    s.add_company(NewCompany { name: name.into(), description: None, is_parent: false })
      .await
      .unwrap();
  }
  s
}

type Rows = Vec<Vec<&'static str>>;

/// Cell text for each of the five sheets; `""` leaves a cell empty.
#[derive(Clone)]
struct Upload {
  employees:      Rows,
  education:      Rows,
  work:           Rows,
  certifications: Rows,
  organizations:  Rows,
}

impl Upload {
  fn valid() -> Self {
    Self {
      employees:      vec![
        vec![
          "K001", "Ani Wijaya", "ani@example.com", "1990-01-01", "Manager", "IT",
          "BOD-3", "Technical", "Yes", "1",
        ],
        vec![
          "K002", "Budi Santoso", "budi@example.com", "1988/07/14", "Analyst",
          "Finance", "BOD-4", "Keuangan", "No", "2",
        ],
      ],
      education:      vec![
        vec!["K001", "S1", "Universitas Indonesia", "Teknik Informatika", "2008", "2012"],
        vec!["K001", "S2", "Universitas Gadjah Mada", "Ilmu Komputer", "2013", "2015"],
        vec!["K002", "D3", "Politeknik Negeri Bandung", "Akuntansi", "2006", "2009"],
      ],
      work:           vec![vec![
        "K001", "PT XYZ", "Software Developer", "2015-01-01", "2020-12-31",
        "Pengembangan aplikasi web",
      ]],
      certifications: vec![vec![
        "K002", "Brevet A", "IAI", "2012-03-01", "", "",
      ]],
      organizations:  vec![vec!["K001", "HIMA", "Ketua", "2010-01-01", "2011-01-01", ""]],
    }
  }

  fn bytes(&self) -> Vec<u8> { self.bytes_without(None) }

  fn bytes_without(&self, skip: Option<&str>) -> Vec<u8> {
    let mut workbook = XlsxWorkbook::new();
    for (schema, rows) in [
      (schema::EMPLOYEES, &self.employees),
      (schema::EDUCATION, &self.education),
      (schema::WORK_EXPERIENCE, &self.work),
      (schema::CERTIFICATIONS, &self.certifications),
      (schema::ORGANIZATION_HISTORY, &self.organizations),
    ] {
      if skip == Some(schema.name) {
        continue;
      }
      write_sheet(&mut workbook, schema, rows);
    }
    workbook.save_to_buffer().unwrap()
  }
}

fn write_sheet(workbook: &mut XlsxWorkbook, schema: SheetSchema, rows: &Rows) {
  let sheet = workbook.add_worksheet();
  sheet.set_name(schema.name).unwrap();
  for (col, column) in (0u16..).zip(schema.columns) {
    sheet.write_string(0, col, column.header).unwrap();
    sheet.write_string(1, col, column.example).unwrap();
  }
  for (row, cells) in (2u32..).zip(rows) {
    for (col, value) in (0u16..).zip(cells) {
      if !value.is_empty() {
        sheet.write_string(row, col, *value).unwrap();
      }
    }
  }
}

fn hrd(company: i64) -> Caller {
  Caller {
    user_id:    Some(UserId(7)),
    role:       Role::Hrd,
    company_id: Some(CompanyId(company)),
  }
}

fn by_name<'a>(all: &'a [EmployeeSummary], name: &str) -> &'a EmployeeSummary {
  all.iter().find(|e| e.employee.name == name).expect("employee present")
}

/// Every row of `sheet` as display strings, headers included.
fn sheet_rows(bytes: &[u8], sheet: &str) -> Vec<Vec<String>> {
  let mut wb = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).unwrap();
  let range = wb.worksheet_range(sheet).unwrap();
  range.rows().map(|r| r.iter().map(|d| d.to_string()).collect()).collect()
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_creates_employees_with_children() {
  let s = store().await;

  let report = import_workbook(&s, &Caller::system(), &Upload::valid().bytes())
    .await
    .unwrap();
  assert_eq!((report.intended, report.created, report.updated), (2, 2, 0));

  let all = s.list_employees(Scope::All).await.unwrap();
  let ani = by_name(&all, "Ani Wijaya");
  assert_eq!(ani.employee.company_id, CompanyId(1));
  assert_eq!(ani.employee.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));
  assert_eq!(ani.education.len(), 2);

  let profile = s.get_employee(ani.employee.id).await.unwrap().unwrap();
  assert_eq!(profile.children.work_experience.len(), 1);
  assert_eq!(profile.children.organization_history.len(), 1);
  assert!(profile.children.certifications.is_empty());

  let budi = by_name(&all, "Budi Santoso");
  let profile = s.get_employee(budi.employee.id).await.unwrap().unwrap();
  assert_eq!(profile.children.certifications[0].expiry_date, None);
  assert_eq!(profile.children.certifications[0].description, None);
}

#[tokio::test]
async fn reupload_replaces_child_rows() {
  let s = store().await;
  let mut upload = Upload::valid();
  import_workbook(&s, &Caller::system(), &upload.bytes()).await.unwrap();

  upload.education.remove(1);
  let report = import_workbook(&s, &Caller::system(), &upload.bytes()).await.unwrap();
  assert_eq!((report.created, report.updated), (0, 2));

  let all = s.list_employees(Scope::All).await.unwrap();
  assert_eq!(all.len(), 2);
  let ani = by_name(&all, "Ani Wijaya");
  assert_eq!(ani.education.len(), 1);
  assert_eq!(ani.education[0].institution, "Universitas Indonesia");
}

#[tokio::test]
async fn out_of_range_level_rejects_whole_upload() {
  let s = store().await;
  let mut upload = Upload::valid();
  upload.employees[1][6] = "BOD-6";

  let err = import_workbook(&s, &Caller::system(), &upload.bytes()).await.unwrap_err();
  match err {
    IngestError::Validation(ValidationError::InvalidEnum { sheet, row, field, allowed }) => {
      assert_eq!(sheet, "Data Karyawan");
      assert_eq!(row, 4);
      assert_eq!(field, "Level");
      assert_eq!(allowed, ["BOD-1", "BOD-2", "BOD-3", "BOD-4", "BOD-5"]);
    }
    other => panic!("unexpected error: {other:?}"),
  }
  assert!(s.list_employees(Scope::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_sheet_writes_nothing() {
  let s = store().await;
  let bytes = Upload::valid().bytes_without(Some("Riwayat Organisasi"));

  let err = import_workbook(&s, &Caller::system(), &bytes).await.unwrap_err();
  assert!(matches!(
    err,
    IngestError::Validation(ValidationError::MissingSheet("Riwayat Organisasi"))
  ));
  assert!(s.list_employees(Scope::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_company_is_rejected() {
  let s = store().await;
  let mut upload = Upload::valid();
  upload.employees[0][9] = "4";

  let err = import_workbook(&s, &Caller::system(), &upload.bytes()).await.unwrap_err();
  assert!(matches!(
    err,
    IngestError::Validation(ValidationError::InvalidEnum { row: 3, field: "ID Perusahaan", .. })
  ));
}

#[tokio::test]
async fn hrd_cannot_upload_for_another_company() {
  let s = store().await;

  let err = import_workbook(&s, &hrd(1), &Upload::valid().bytes()).await.unwrap_err();
  assert!(matches!(
    err,
    IngestError::Forbidden { row: 4, company_id: CompanyId(2) }
  ));
  assert!(s.list_employees(Scope::All).await.unwrap().is_empty());

  let mut own = Upload::valid();
  own.employees.truncate(1);
  let report = import_workbook(&s, &hrd(1), &own.bytes()).await.unwrap();
  assert_eq!(report.created, 1);
}

#[tokio::test]
async fn garbage_is_a_read_error() {
  let s = store().await;
  let err = import_workbook(&s, &Caller::system(), b"PK not really").await.unwrap_err();
  assert!(matches!(err, IngestError::Read(_)));
}

#[tokio::test]
async fn native_dates_and_numeric_ids_are_accepted() {
  let s = store().await;
  let upload = Upload::valid();

  let mut workbook = XlsxWorkbook::new();
  let date = Format::new().set_num_format("yyyy-mm-dd");
  let sheet = workbook.add_worksheet();
  sheet.set_name(schema::EMPLOYEES.name).unwrap();
  for (col, column) in (0u16..).zip(schema::EMPLOYEES.columns) {
    sheet.write_string(0, col, column.header).unwrap();
    sheet.write_string(1, col, column.example).unwrap();
  }
  sheet.write_number(2, 0, 1001).unwrap();
  sheet.write_string(2, 1, "Citra Lestari").unwrap();
  sheet.write_string(2, 2, "citra@example.com").unwrap();
  let birth = ExcelDateTime::from_ymd(1992, 11, 3).unwrap();
  sheet.write_datetime_with_format(2, 3, &birth, &date).unwrap();
  sheet.write_string(2, 6, "BOD-2").unwrap();
  sheet.write_string(2, 8, "No").unwrap();
  sheet.write_number(2, 9, 3).unwrap();

  let education = vec![vec!["1001", "S1", "ITB", "Fisika", "2010", "2014"]];
  write_sheet(&mut workbook, schema::EDUCATION, &education);
  write_sheet(&mut workbook, schema::WORK_EXPERIENCE, &upload.work);
  write_sheet(&mut workbook, schema::CERTIFICATIONS, &upload.certifications);
  write_sheet(&mut workbook, schema::ORGANIZATION_HISTORY, &upload.organizations);
  let bytes = workbook.save_to_buffer().unwrap();

  import_workbook(&s, &Caller::system(), &bytes).await.unwrap();

  let all = s.list_employees(Scope::All).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].employee.birth_date, NaiveDate::from_ymd_opt(1992, 11, 3));
  assert_eq!(all[0].employee.company_id, CompanyId(3));
  // Numeric "1001" joins the text "1001" on the education sheet.
  assert_eq!(all[0].education.len(), 1);
}

// ─── Template ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn template_lists_companies_and_exact_headers() {
  let s = store().await;
  let companies = s.list_companies().await.unwrap();
  let bytes = write_template(&companies).unwrap();

  let workbook = read_workbook(&bytes).unwrap();
  assert_eq!(workbook.sheets.len(), 5, "instructions sheet is not parsed");
  for schema in schema::REQUIRED_SHEETS {
    let sheet = workbook.sheet(schema.name).unwrap();
    assert_eq!(sheet.headers, schema.headers().collect::<Vec<_>>());
    // Only the example row is present, and it is skipped.
    assert!(sheet.rows.is_empty());
  }

  let instructions = sheet_rows(&bytes, "Petunjuk");
  assert!(instructions.iter().any(|r| r[0] == "Daftar Perusahaan:"));
  assert!(
    instructions
      .iter()
      .any(|r| r.get(1).is_some_and(|n| n == "PT Jaminan Kredit Indonesia"))
  );

  // An untouched template carries no data rows.
  let err = import_workbook(&s, &Caller::system(), &bytes).await.unwrap_err();
  assert!(matches!(
    err,
    IngestError::Validation(ValidationError::MissingSheet("Data Karyawan"))
  ));
}

// ─── Exports ─────────────────────────────────────────────────────────────────

async fn store_with_applications() -> SqliteStore {
  let s = store().await;
  import_workbook(&s, &Caller::system(), &Upload::valid().bytes()).await.unwrap();
  let all = s.list_employees(Scope::All).await.unwrap();

  let job = s
    .add_job(NewJob {
      title:              "Kepala Divisi Risiko".into(),
      department:         "Risk".into(),
      location:           "Jakarta".into(),
      description:        "Memimpin divisi manajemen risiko".into(),
      company_id:         CompanyId(3),
      posting_date:       NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
      expiration_date:    NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
      job_type:           "Full-time".into(),
      qualification:      "S2".into(),
      level:              "BOD-2".into(),
      job_family:         "Manajemen Risiko".into(),
      duration_months:    24,
      placement_location: "Jakarta".into(),
    })
    .await
    .unwrap();

  for (summary, status) in
    all.iter().zip([ApplicationStatus::Interview, ApplicationStatus::InReview])
  {
    s.add_application(NewApplication {
      employee_id: summary.employee.id,
      job_id: job.id,
      status,
      applied_at: None,
    })
    .await
    .unwrap();
  }
  s
}

#[tokio::test]
async fn candidate_recap_filters_by_status() {
  let s = store_with_applications().await;
  let apps = s.list_applications(Scope::All).await.unwrap();

  let all = sheet_rows(&export::candidate_recap(&apps, None).unwrap(), "Rekap Kandidat");
  assert_eq!(all.len(), 3);
  assert_eq!(all[0][0], "Nama Kandidat");
  assert_eq!(all[0][8], "Status");

  let interview = sheet_rows(
    &export::candidate_recap(&apps, Some(ApplicationStatus::Interview)).unwrap(),
    "Rekap Kandidat",
  );
  assert_eq!(interview.len(), 2);
  assert_eq!(interview[1][2], "Kepala Divisi Risiko");
  assert_eq!(interview[1][4], "PT Jaminan Kredit Indonesia");
  assert_eq!(interview[1][8], "Interview");
}

#[tokio::test]
async fn completed_report_uses_final_status() {
  let s = store_with_applications().await;
  let apps = s.list_applications(Scope::All).await.unwrap();
  s.complete_application(apps[0].application.id).await.unwrap();

  let completed = s.list_completed_applications(Scope::All).await.unwrap();
  let rows = sheet_rows(&export::completed_report(&completed).unwrap(), "Completed Applications");
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0][4], "Perusahaan Tujuan");
  assert_eq!(rows[1][7], "Selesai");
}

#[tokio::test]
async fn database_dump_never_contains_password_hashes() {
  let s = store_with_applications().await;
  s.add_user(NewUser {
    name:          "Admin".into(),
    email:         "admin@example.com".into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    role:          Role::Superadmin,
    company_id:    None,
  })
  .await
  .unwrap();

  let dump = DatabaseDump {
    companies:    s.list_companies().await.unwrap(),
    employees:    s.list_employees(Scope::All).await.unwrap(),
    education:    s.list_education().await.unwrap(),
    jobs:         s.list_jobs(Scope::All).await.unwrap(),
    applications: s.list_applications(Scope::All).await.unwrap(),
    completed:    s.list_completed_applications(Scope::All).await.unwrap(),
    users:        s.list_users().await.unwrap(),
  };
  let bytes = export::database_dump(&dump).unwrap();

  let mut wb = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.clone())).unwrap();
  assert_eq!(wb.sheet_names(), [
    "Companies",
    "Employees",
    "PendidikanKaryawan",
    "Jobs",
    "Applications",
    "CompletedApplications",
    "Users",
  ]);
  for name in wb.sheet_names().to_vec() {
    let range = wb.worksheet_range(&name).unwrap();
    assert!(range.rows().flatten().all(|d| !d.to_string().contains("argon2")));
  }

  let education = sheet_rows(&bytes, "PendidikanKaryawan");
  assert_eq!(education.len(), 4);
  let users = sheet_rows(&bytes, "Users");
  assert_eq!(users[1][3], "superadmin");
}
