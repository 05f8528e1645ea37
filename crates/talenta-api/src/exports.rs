//! Workbook exports.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/exports/candidates` | Optional `?status=`; scoped like `/applications` |
//! | `GET`  | `/exports/completed` | Scoped like `/completed-applications` |
//! | `GET`  | `/exports/database` | Superadmin only; every table, no password hashes |

use axum::{
  extract::{Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use talenta_core::{application::ApplicationStatus, scope::Scope, store::PortalStore};
use talenta_sheets::{
  XLSX_CONTENT_TYPE,
  export::{self, DatabaseDump},
};

use crate::{AppState, auth::Auth, error::ApiError};

/// An xlsx download named `filename`.
pub(crate) fn xlsx_response(filename: &str, bytes: Vec<u8>) -> Response {
  (
    [
      (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
    ],
    bytes,
  )
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CandidateParams {
  pub status: Option<ApplicationStatus>,
}

/// `GET /exports/candidates[?status=<status>]`
pub async fn candidates<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Query(params): Query<CandidateParams>,
) -> Result<Response, ApiError> {
  let applications = state
    .store
    .list_applications(auth.caller().scope())
    .await
    .map_err(ApiError::store)?;
  let bytes = export::candidate_recap(&applications, params.status)?;
  Ok(xlsx_response("rekap_kandidat.xlsx", bytes))
}

/// `GET /exports/completed`
pub async fn completed<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Response, ApiError> {
  let completed = state
    .store
    .list_completed_applications(auth.caller().scope())
    .await
    .map_err(ApiError::store)?;
  let bytes = export::completed_report(&completed)?;
  Ok(xlsx_response("completed_applications.xlsx", bytes))
}

/// `GET /exports/database`
pub async fn database<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Response, ApiError> {
  auth.caller().require_superadmin()?;
  let store = state.store.as_ref();

  let dump = DatabaseDump {
    companies:    store.list_companies().await.map_err(ApiError::store)?,
    employees:    store.list_employees(Scope::All).await.map_err(ApiError::store)?,
    education:    store.list_education().await.map_err(ApiError::store)?,
    jobs:         store.list_jobs(Scope::All).await.map_err(ApiError::store)?,
    applications: store.list_applications(Scope::All).await.map_err(ApiError::store)?,
    completed:    store
      .list_completed_applications(Scope::All)
      .await
      .map_err(ApiError::store)?,
    users:        store.list_users().await.map_err(ApiError::store)?,
  };
  let bytes = export::database_dump(&dump)?;
  Ok(xlsx_response("database_export.xlsx", bytes))
}
