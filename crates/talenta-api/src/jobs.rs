//! Handlers for `/jobs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/jobs` | Scoped by the posting company |
//! | `POST`   | `/jobs` | Body: [`NewJob`]; returns 201 |
//! | `GET`    | `/jobs/{id}` | |
//! | `PUT`    | `/jobs/{id}` | Full replace |
//! | `DELETE` | `/jobs/{id}` | 409 while applications reference the job |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use talenta_core::{
  id::JobId,
  job::{JobListing, NewJob},
  store::PortalStore,
};

use crate::{AppState, auth::Auth, error::ApiError};

async fn visible<S: PortalStore>(
  state: &AppState<S>,
  auth: &Auth,
  id: JobId,
) -> Result<JobListing, ApiError> {
  state
    .store
    .get_job(id)
    .await
    .map_err(ApiError::store)?
    .filter(|l| auth.caller().scope().admits(l.job.company_id))
    .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))
}

/// `GET /jobs`
pub async fn list<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Json<Vec<JobListing>>, ApiError> {
  let jobs = state
    .store
    .list_jobs(auth.caller().scope())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(jobs))
}

/// `GET /jobs/{id}`
pub async fn get_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<JobId>,
) -> Result<Json<JobListing>, ApiError> {
  Ok(Json(visible(&state, &auth, id).await?))
}

/// `POST /jobs`
pub async fn create<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Json(body): Json<NewJob>,
) -> Result<impl IntoResponse, ApiError> {
  auth.caller().scope().ensure(body.company_id)?;
  let job = state.store.add_job(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(job)))
}

/// `PUT /jobs/{id}`
pub async fn update<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<JobId>,
  Json(body): Json<NewJob>,
) -> Result<impl IntoResponse, ApiError> {
  visible(&state, &auth, id).await?;
  auth.caller().scope().ensure(body.company_id)?;
  let job = state.store.update_job(id, body).await.map_err(ApiError::store)?;
  Ok(Json(job))
}

/// `DELETE /jobs/{id}`
pub async fn delete_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<JobId>,
) -> Result<StatusCode, ApiError> {
  visible(&state, &auth, id).await?;
  state.store.delete_job(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
