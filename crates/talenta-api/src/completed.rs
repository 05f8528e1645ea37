//! Handlers for `/completed-applications` endpoints.
//!
//! A completed application is visible to HR staff of either side: the
//! employee's company or the job's company.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use talenta_core::{
  application::CompletedApplicationDetail,
  id::CompletedApplicationId,
  store::PortalStore,
};

use crate::{AppState, auth::Auth, error::ApiError};

async fn visible<S: PortalStore>(
  state: &AppState<S>,
  auth: &Auth,
  id: CompletedApplicationId,
) -> Result<CompletedApplicationDetail, ApiError> {
  let scope = auth.caller().scope();
  state
    .store
    .get_completed_application(id)
    .await
    .map_err(ApiError::store)?
    .filter(|d| {
      scope.admits(d.candidacy.source_company_id)
        || scope.admits(d.candidacy.target_company_id)
    })
    .ok_or_else(|| ApiError::NotFound(format!("completed application {id} not found")))
}

/// `GET /completed-applications`
pub async fn list<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Json<Vec<CompletedApplicationDetail>>, ApiError> {
  let completed = state
    .store
    .list_completed_applications(auth.caller().scope())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(completed))
}

/// `GET /completed-applications/{id}`
pub async fn get_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<CompletedApplicationId>,
) -> Result<Json<CompletedApplicationDetail>, ApiError> {
  Ok(Json(visible(&state, &auth, id).await?))
}

/// `DELETE /completed-applications/{id}`
pub async fn delete_one<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<CompletedApplicationId>,
) -> Result<StatusCode, ApiError> {
  visible(&state, &auth, id).await?;
  state
    .store
    .delete_completed_application(id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
