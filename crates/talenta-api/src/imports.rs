//! Bulk employee upload and the blank upload template.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/imports/employees` | Body: raw workbook bytes; returns the upsert report |
//! | `GET`  | `/imports/template` | xlsx download |

use axum::{Json, extract::State, response::Response};
use bytes::Bytes;
use talenta_core::{batch::UpsertReport, store::PortalStore};
use talenta_sheets::{import_workbook, template::write_template};

use crate::{AppState, auth::Auth, error::ApiError, exports::xlsx_response};

/// `POST /imports/employees`
///
/// The whole workbook is validated before anything is written; the first
/// violation is returned as a 400 naming its sheet, row and field.
pub async fn upload<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  body: Bytes,
) -> Result<Json<UpsertReport>, ApiError> {
  if body.is_empty() {
    return Err(ApiError::BadRequest("empty upload".into()));
  }
  tracing::info!(user_id = %auth.user.id, bytes = body.len(), "workbook upload received");
  let report = import_workbook(state.store.as_ref(), &auth.caller(), &body).await?;
  Ok(Json(report))
}

/// `GET /imports/template`
pub async fn template<S: PortalStore>(
  State(state): State<AppState<S>>,
  _auth: Auth,
) -> Result<Response, ApiError> {
  let companies = state.store.list_companies().await.map_err(ApiError::store)?;
  let bytes = write_template(&companies)?;
  Ok(xlsx_response("template_data_karyawan.xlsx", bytes))
}
