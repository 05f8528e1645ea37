//! Handlers for `/employees` and `/talent-mobility`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/employees` | Scoped listing with education |
//! | `POST`   | `/employees` | Body: [`EmployeeRecord`]; returns 201 |
//! | `GET`    | `/employees/{id}` | Profile with every child collection |
//! | `PUT`    | `/employees/{id}` | Full replace, collections included |
//! | `DELETE` | `/employees/{id}` | Also removes children and applications |
//! | `GET`    | `/talent-mobility` | HR staff only: their mobility pool |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use talenta_core::{
  application::MobilityCandidate,
  employee::{EmployeeProfile, EmployeeRecord, EmployeeSummary},
  id::EmployeeId,
  scope::Scope,
  store::PortalStore,
};

use crate::{AppState, auth::Auth, error::ApiError};

/// Fetch an employee the caller is allowed to see. Other companies' rows
/// are reported as missing.
async fn visible<S: PortalStore>(
  state: &AppState<S>,
  auth: &Auth,
  id: EmployeeId,
) -> Result<EmployeeProfile, ApiError> {
  state
    .store
    .get_employee(id)
    .await
    .map_err(ApiError::store)?
    .filter(|p| auth.caller().scope().admits(p.employee.company_id))
    .ok_or_else(|| ApiError::NotFound(format!("employee {id} not found")))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /employees`
pub async fn list<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Json<Vec<EmployeeSummary>>, ApiError> {
  let employees = state
    .store
    .list_employees(auth.caller().scope())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employees))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /employees/{id}`
pub async fn get_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<EmployeeId>,
) -> Result<Json<EmployeeProfile>, ApiError> {
  Ok(Json(visible(&state, &auth, id).await?))
}

// ─── Create / update / delete ────────────────────────────────────────────────

/// `POST /employees`
pub async fn create<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Json(record): Json<EmployeeRecord>,
) -> Result<impl IntoResponse, ApiError> {
  auth.caller().scope().ensure(record.employee.company_id)?;
  let employee = state.store.add_employee(record).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(employee)))
}

/// `PUT /employees/{id}`: the caller must be allowed both the current and
/// the new company.
pub async fn update<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<EmployeeId>,
  Json(record): Json<EmployeeRecord>,
) -> Result<impl IntoResponse, ApiError> {
  visible(&state, &auth, id).await?;
  auth.caller().scope().ensure(record.employee.company_id)?;
  let employee = state
    .store
    .update_employee(id, record)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employee))
}

/// `DELETE /employees/{id}`
pub async fn delete_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<EmployeeId>,
) -> Result<StatusCode, ApiError> {
  visible(&state, &auth, id).await?;
  state.store.delete_employee(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Talent mobility ─────────────────────────────────────────────────────────

/// `GET /talent-mobility`: employees of the caller's company who are open
/// to a transfer or already have a live application.
pub async fn talent_mobility<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Json<Vec<MobilityCandidate>>, ApiError> {
  let caller = auth.caller();
  let company = match caller.scope() {
    Scope::Company(company) if !caller.is_superadmin() => company,
    _ => {
      return Err(ApiError::Forbidden(
        "talent mobility is only available to company HR staff".into(),
      ));
    }
  };
  let candidates = state
    .store
    .list_mobility_candidates(company)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(candidates))
}
