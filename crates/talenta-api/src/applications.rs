//! Handlers for `/applications` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/applications` | Scoped by the job's company |
//! | `POST`   | `/applications` | Body: [`NewApplication`]; flags the employee as mobile |
//! | `GET`    | `/applications/outgoing` | `?company_id`; applications by that company's employees |
//! | `GET`    | `/applications/{id}` | |
//! | `DELETE` | `/applications/{id}` | |
//! | `PUT`    | `/applications/{id}/status` | Body: `{"status":"Interview"}` |
//! | `POST`   | `/applications/{id}/complete` | Moves the row to completed applications |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use talenta_core::{
  application::{
    Application, ApplicationDetail, ApplicationStatus, CompletedApplication,
    NewApplication,
  },
  id::{ApplicationId, CompanyId},
  store::PortalStore,
};

use crate::{AppState, auth::Auth, error::ApiError};

/// Fetch an application whose job the caller's company owns; anything else
/// is reported as missing.
async fn visible<S: PortalStore>(
  state: &AppState<S>,
  auth: &Auth,
  id: ApplicationId,
) -> Result<ApplicationDetail, ApiError> {
  state
    .store
    .get_application(id)
    .await
    .map_err(ApiError::store)?
    .filter(|d| auth.caller().scope().admits(d.candidacy.target_company_id))
    .ok_or_else(|| ApiError::NotFound(format!("application {id} not found")))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /applications`
pub async fn list<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Json<Vec<ApplicationDetail>>, ApiError> {
  let applications = state
    .store
    .list_applications(auth.caller().scope())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(applications))
}

#[derive(Debug, Deserialize)]
pub struct OutgoingParams {
  /// Defaults to the caller's own company.
  pub company_id: Option<CompanyId>,
}

/// `GET /applications/outgoing[?company_id=<id>]`
pub async fn outgoing<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Query(params): Query<OutgoingParams>,
) -> Result<Json<Vec<ApplicationDetail>>, ApiError> {
  let caller = auth.caller();
  let company = params
    .company_id
    .or(caller.company_id)
    .ok_or_else(|| ApiError::BadRequest("company_id is required".into()))?;
  caller.scope().ensure(company)?;

  let applications = state
    .store
    .list_outgoing_applications(company)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(applications))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /applications/{id}`
pub async fn get_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<ApplicationId>,
) -> Result<Json<ApplicationDetail>, ApiError> {
  Ok(Json(visible(&state, &auth, id).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /applications`: either the employee's or the job's company must be
/// the caller's.
pub async fn create<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Json(body): Json<NewApplication>,
) -> Result<impl IntoResponse, ApiError> {
  let employee = state
    .store
    .get_employee(body.employee_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee {} not found", body.employee_id)))?;
  let job = state
    .store
    .get_job(body.job_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("job {} not found", body.job_id)))?;

  let scope = auth.caller().scope();
  if !scope.admits(employee.employee.company_id) {
    scope.ensure(job.job.company_id)?;
  }

  let application = state.store.add_application(body).await.map_err(ApiError::store)?;
  tracing::info!(
    application_id = %application.id,
    employee_id = %application.employee_id,
    job_id = %application.job_id,
    "application submitted"
  );
  Ok((StatusCode::CREATED, Json(application)))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ApplicationStatus,
}

/// `PUT /applications/{id}/status`: any status may follow any other.
pub async fn set_status<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<ApplicationId>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Application>, ApiError> {
  visible(&state, &auth, id).await?;
  let application = state
    .store
    .update_application_status(id, body.status)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(application))
}

/// `DELETE /applications/{id}`
pub async fn delete_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<ApplicationId>,
) -> Result<StatusCode, ApiError> {
  visible(&state, &auth, id).await?;
  state.store.delete_application(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /applications/{id}/complete`
///
/// The current status is not checked; any live application can be
/// completed.
pub async fn complete<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<ApplicationId>,
) -> Result<Json<CompletedApplication>, ApiError> {
  visible(&state, &auth, id).await?;
  let completed = state
    .store
    .complete_application(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(completed))
}
