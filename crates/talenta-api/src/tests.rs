//! Router tests through `tower::ServiceExt::oneshot` against an in-memory
//! store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use serde_json::{Value, json};
use talenta_core::{
  application::{ApplicationStatus, NewApplication},
  company::NewCompany,
  employee::{ChildCollections, EmployeeRecord, Level, NewEmployee, TalentMobility},
  id::{ApplicationId, CompanyId, EmployeeId, JobId},
  job::NewJob,
  scope::Scope,
  store::PortalStore,
  user::{NewUser, Role},
};
use talenta_sheets::{XLSX_CONTENT_TYPE, schema};
use talenta_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, api_router, auth::hash_password};

const ADMIN: (&str, &str) = ("admin@example.com", "admin-pass");
const HR1: (&str, &str) = ("hr1@example.com", "hr1-pass");
const HR2: (&str, &str) = ("hr2@example.com", "hr2-pass");

// ─── Fixtures ────────────────────────────────────────────────────────────────

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for i in 1..=3 {
    store
      .add_company(NewCompany {
        name:        format!("PT Anak Usaha {i}"),
        description: None,
        is_parent:   i == 1,
      })
      .await
      .unwrap();
  }
  for ((email, password), role, company) in [
    (ADMIN, Role::Superadmin, None),
    (HR1, Role::Hrd, Some(CompanyId(1))),
    (HR2, Role::Hrd, Some(CompanyId(2))),
  ] {
    store
      .add_user(NewUser {
        name: email.split('@').next().unwrap_or_default().to_owned(),
        email: email.to_owned(),
        password_hash: hash_password(password).unwrap(),
        role,
        company_id: company,
      })
      .await
      .unwrap();
  }
  AppState::new(Arc::new(store))
}

fn employee(name: &str, company: i64) -> EmployeeRecord {
  EmployeeRecord {
    employee: NewEmployee {
      name:            name.into(),
      email:           format!("{}@example.com", name.to_lowercase()),
      birth_date:      NaiveDate::from_ymd_opt(1991, 2, 3),
      position:        "Analyst".into(),
      department:      "Finance".into(),
      company_id:      CompanyId(company),
      level:           Level::Bod4,
      job_family:      "Keuangan".into(),
      talent_mobility: TalentMobility::No,
    },
    children: ChildCollections::default(),
  }
}

fn job(title: &str, company: i64) -> NewJob {
  NewJob {
    title:              title.into(),
    department:         "Operations".into(),
    location:           "Jakarta".into(),
    description:        "Lead the operations team".into(),
    company_id:         CompanyId(company),
    posting_date:       NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    expiration_date:    NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
    job_type:           "Full-time".into(),
    qualification:      "S1".into(),
    level:              "BOD-3".into(),
    job_family:         "Operasional".into(),
    duration_months:    12,
    placement_location: "Surabaya".into(),
  }
}

async fn seed_employee(state: &AppState<SqliteStore>, name: &str, company: i64) -> EmployeeId {
  state.store.add_employee(employee(name, company)).await.unwrap().id
}

async fn seed_job(state: &AppState<SqliteStore>, title: &str, company: i64) -> JobId {
  state.store.add_job(job(title, company)).await.unwrap().id
}

async fn seed_application(
  state: &AppState<SqliteStore>,
  employee_id: EmployeeId,
  job_id: JobId,
) -> ApplicationId {
  state
    .store
    .add_application(NewApplication {
      employee_id,
      job_id,
      status: ApplicationStatus::InReview,
      applied_at: None,
    })
    .await
    .unwrap()
    .id
}

fn basic((email, password): (&str, &str)) -> String {
  format!("Basic {}", B64.encode(format!("{email}:{password}")))
}

async fn send(
  state: &AppState<SqliteStore>,
  method: &str,
  uri: &str,
  auth: Option<(&str, &str)>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(creds) = auth {
    builder = builder.header(header::AUTHORIZATION, basic(creds));
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  api_router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn upload(state: &AppState<SqliteStore>, auth: (&str, &str), bytes: Vec<u8>) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri("/imports/employees")
    .header(header::AUTHORIZATION, basic(auth))
    .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
    .body(Body::from(bytes))
    .unwrap();
  api_router(state.clone()).oneshot(req).await.unwrap()
}

async fn json_of(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

/// A five-sheet upload with one employee per `(id, company, level)`.
fn workbook(rows: &[(&str, &str, &str)]) -> Vec<u8> {
  let mut wb = XlsxWorkbook::new();
  for schema in schema::REQUIRED_SHEETS {
    let sheet = wb.add_worksheet();
    sheet.set_name(schema.name).unwrap();
    for (col, column) in (0u16..).zip(schema.columns) {
      sheet.write_string(0, col, column.header).unwrap();
      sheet.write_string(1, col, column.example).unwrap();
    }
    for (row, (local_id, company, level)) in (2u32..).zip(rows) {
      let cells: Vec<String> = match schema.name {
        "Data Karyawan" => vec![
          (*local_id).into(),
          format!("Pegawai {local_id}"),
          format!("{local_id}@example.com"),
          "1990-01-01".into(),
          "Staf".into(),
          "Umum".into(),
          (*level).into(),
          "Umum".into(),
          "No".into(),
          (*company).into(),
        ],
        "Data Pendidikan" => vec![
          (*local_id).into(),
          "S1".into(),
          "Universitas Indonesia".into(),
          "Manajemen".into(),
        ],
        _ => vec![(*local_id).into(), "Isian".into()],
      };
      for (col, value) in (0u16..).zip(&cells) {
        sheet.write_string(row, col, value).unwrap();
      }
    }
  }
  wb.save_to_buffer().unwrap()
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_credentials_are_rejected() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/employees", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

  let resp = send(&state, "GET", "/employees", Some((HR1.0, "wrong")), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_user_without_hash() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/login",
    None,
    Some(json!({ "email": HR1.0, "password": HR1.1 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let user = json_of(resp).await;
  assert_eq!(user["role"], "hrd");
  assert_eq!(user["company_id"], 1);
  assert!(user.get("password_hash").is_none());

  let resp = send(
    &state,
    "POST",
    "/login",
    None,
    Some(json!({ "email": "nobody@example.com", "password": "x" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ─── Role scoping ────────────────────────────────────────────────────────────

#[tokio::test]
async fn employee_listing_is_scoped_by_company() {
  let state = make_state().await;
  seed_employee(&state, "Ani", 1).await;
  seed_employee(&state, "Budi", 2).await;

  let hr = json_of(send(&state, "GET", "/employees", Some(HR1), None).await).await;
  let names: Vec<_> = hr.as_array().unwrap().iter().map(|e| e["name"].clone()).collect();
  assert_eq!(names, [json!("Ani")]);

  let admin = json_of(send(&state, "GET", "/employees", Some(ADMIN), None).await).await;
  assert_eq!(admin.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn other_companies_rows_look_missing() {
  let state = make_state().await;
  let budi = seed_employee(&state, "Budi", 2).await;
  let job = seed_job(&state, "Kepala Cabang", 2).await;
  let app = seed_application(&state, budi, job).await;

  // Same answer as for an id that does not exist at all.
  for uri in [
    format!("/employees/{budi}"),
    format!("/jobs/{job}"),
    format!("/applications/{app}"),
    "/employees/999".to_owned(),
  ] {
    let resp = send(&state, "GET", &uri, Some(HR1), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
  }

  let resp = send(&state, "DELETE", &format!("/employees/{budi}"), Some(HR1), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(state.store.get_employee(budi).await.unwrap().is_some());

  let resp = send(&state, "GET", &format!("/employees/{budi}"), Some(HR2), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn hr_cannot_move_employee_to_another_company() {
  let state = make_state().await;
  let ani = seed_employee(&state, "Ani", 1).await;

  let body = serde_json::to_value(employee("Ani", 2)).unwrap();
  let resp = send(&state, "PUT", &format!("/employees/{ani}"), Some(HR1), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let body = serde_json::to_value(employee("Ani", 1)).unwrap();
  let resp = send(&state, "POST", "/employees", Some(HR1), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn applications_are_scoped_by_job_company() {
  let state = make_state().await;
  let ani = seed_employee(&state, "Ani", 1).await;
  let at_two = seed_job(&state, "Kepala Cabang", 2).await;
  let at_three = seed_job(&state, "Analis Risiko", 3).await;
  seed_application(&state, ani, at_two).await;
  seed_application(&state, ani, at_three).await;

  let apps = json_of(send(&state, "GET", "/applications", Some(HR2), None).await).await;
  let apps = apps.as_array().unwrap();
  assert_eq!(apps.len(), 1);
  assert_eq!(apps[0]["job_title"], "Kepala Cabang");
  assert_eq!(apps[0]["target_company_id"], 2);

  // The employee's own company sees both through the outgoing view.
  let out = json_of(send(&state, "GET", "/applications/outgoing", Some(HR1), None).await).await;
  assert_eq!(out.as_array().unwrap().len(), 2);

  let resp = send(&state, "GET", "/applications/outgoing?company_id=1", Some(HR2), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_company_name_conflicts() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/companies",
    Some(ADMIN),
    Some(json!({ "name": "PT Anak Usaha 1", "description": null })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert_eq!(state.store.list_companies().await.unwrap().len(), 3);

  let resp = send(
    &state,
    "POST",
    "/companies",
    Some(ADMIN),
    Some(json!({ "name": "PT Anak Usaha 4", "description": null })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn unknown_company_is_not_found() {
  let state = make_state().await;

  let body = serde_json::to_value(job("Analis Risiko", 77)).unwrap();
  let resp = send(&state, "POST", "/jobs", Some(ADMIN), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(state.store.list_jobs(Scope::All).await.unwrap().is_empty());

  let body = serde_json::to_value(employee("Eka", 77)).unwrap();
  let resp = send(&state, "POST", "/employees", Some(ADMIN), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let eka = seed_employee(&state, "Eka", 1).await;
  let body = serde_json::to_value(employee("Eka", 77)).unwrap();
  let resp = send(&state, "PUT", &format!("/employees/{eka}"), Some(ADMIN), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let profile = state.store.get_employee(eka).await.unwrap().unwrap();
  assert_eq!(profile.employee.company_id, CompanyId(1));
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_update_and_complete() {
  let state = make_state().await;
  let ani = seed_employee(&state, "Ani", 1).await;
  let job = seed_job(&state, "Kepala Cabang", 2).await;

  let resp = send(
    &state,
    "POST",
    "/applications",
    Some(HR1),
    Some(json!({ "employee_id": ani, "job_id": job })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let app = json_of(resp).await;
  assert_eq!(app["status"], "Dalam Review");
  let id = app["id"].as_i64().unwrap();

  let profile = state.store.get_employee(ani).await.unwrap().unwrap();
  assert_eq!(profile.employee.talent_mobility, TalentMobility::Yes);

  let resp = send(
    &state,
    "PUT",
    &format!("/applications/{id}/status"),
    Some(HR2),
    Some(json!({ "status": "Onboarding" })),
  )
  .await;
  assert_eq!(json_of(resp).await["status"], "Onboarding");

  let resp = send(&state, "POST", &format!("/applications/{id}/complete"), Some(HR2), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_of(resp).await["status"], "Selesai");

  let resp = send(&state, "GET", &format!("/applications/{id}"), Some(HR2), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  // Both sides see the completed row.
  for hr in [HR1, HR2] {
    let done =
      json_of(send(&state, "GET", "/completed-applications", Some(hr), None).await).await;
    assert_eq!(done.as_array().unwrap().len(), 1);
  }
}

#[tokio::test]
async fn unrelated_company_cannot_apply() {
  let state = make_state().await;
  let ani = seed_employee(&state, "Ani", 1).await;
  let job = seed_job(&state, "Kepala Cabang", 3).await;

  let resp = send(
    &state,
    "POST",
    "/applications",
    Some(HR2),
    Some(json!({ "employee_id": ani, "job_id": job })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert!(state.store.list_applications(Scope::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn job_with_applications_cannot_be_deleted() {
  let state = make_state().await;
  let ani = seed_employee(&state, "Ani", 1).await;
  let job = seed_job(&state, "Kepala Cabang", 1).await;
  seed_application(&state, ani, job).await;

  let resp = send(&state, "DELETE", &format!("/jobs/{job}"), Some(HR1), None).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(state.store.get_job(job).await.unwrap().is_some());
}

#[tokio::test]
async fn talent_mobility_is_for_hr_staff() {
  let state = make_state().await;
  let ani = seed_employee(&state, "Ani", 1).await;
  let job = seed_job(&state, "Kepala Cabang", 2).await;
  seed_application(&state, ani, job).await;
  seed_employee(&state, "Citra", 1).await;

  let resp = send(&state, "GET", "/talent-mobility", Some(ADMIN), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let pool = json_of(send(&state, "GET", "/talent-mobility", Some(HR1), None).await).await;
  let pool = pool.as_array().unwrap();
  assert_eq!(pool.len(), 1);
  assert_eq!(pool[0]["name"], "Ani");
  assert_eq!(pool[0]["applications"].as_array().unwrap().len(), 1);
}

// ─── Uploads ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_commits_valid_workbook() {
  let state = make_state().await;
  let resp = upload(&state, HR1, workbook(&[("K001", "1", "BOD-3"), ("K002", "1", "BOD-5")])).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let report = json_of(resp).await;
  assert_eq!(report, json!({ "intended": 2, "created": 2, "updated": 0 }));

  let all = state.store.list_employees(Scope::All).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().all(|e| e.education.len() == 1));
}

#[tokio::test]
async fn upload_reports_first_violation() {
  let state = make_state().await;
  let resp = upload(&state, ADMIN, workbook(&[("K001", "1", "BOD-3"), ("K002", "1", "BOD-6")])).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let message = json_of(resp).await["error"].as_str().unwrap().to_owned();
  assert!(message.contains("Level"), "{message}");
  assert!(message.contains("row 4"), "{message}");
  assert!(state.store.list_employees(Scope::All).await.unwrap().is_empty());

  let resp = upload(&state, ADMIN, b"not a workbook".to_vec()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hr_upload_for_other_company_is_forbidden() {
  let state = make_state().await;
  let resp = upload(&state, HR1, workbook(&[("K001", "1", "BOD-3"), ("K002", "2", "BOD-3")])).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert!(state.store.list_employees(Scope::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn template_is_an_xlsx_download() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/imports/template", Some(HR1), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);
  assert!(
    resp.headers()[header::CONTENT_DISPOSITION]
      .to_str()
      .unwrap()
      .contains("attachment")
  );
}

// ─── Users and exports ───────────────────────────────────────────────────────

#[tokio::test]
async fn user_administration_is_superadmin_only() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/users", Some(HR1), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let new_user = json!({
    "name": "HR Tiga",
    "email": "hr3@example.com",
    "password": "hr3-pass",
    "role": "hrd",
    "company_id": 3
  });
  let resp = send(&state, "POST", "/users", Some(ADMIN), Some(new_user.clone())).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_of(resp).await;

  let resp = send(&state, "POST", "/users", Some(ADMIN), Some(new_user)).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let resp = send(&state, "GET", "/me", Some(("hr3@example.com", "hr3-pass")), None).await;
  assert_eq!(json_of(resp).await["company_id"], 3);

  let id = created["id"].as_i64().unwrap();
  let resp = send(
    &state,
    "PUT",
    &format!("/users/{id}/password"),
    Some(ADMIN),
    Some(json!({ "password": "baru" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  let resp = send(&state, "GET", "/me", Some(("hr3@example.com", "baru")), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let users = json_of(send(&state, "GET", "/users", Some(ADMIN), None).await).await;
  assert_eq!(users.as_array().unwrap().len(), 4);
  assert!(!users.to_string().contains("argon2"));
}

#[tokio::test]
async fn database_export_is_superadmin_only() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/exports/database", Some(HR1), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = send(&state, "GET", "/exports/database", Some(ADMIN), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);

  let resp = send(&state, "GET", "/exports/candidates?status=Interview", Some(HR1), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}
