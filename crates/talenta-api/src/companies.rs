//! Handlers for `/companies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/companies` | Every company of the group, by id |
//! | `POST` | `/companies` | Superadmin only |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use talenta_core::{
  company::{Company, NewCompany},
  store::PortalStore,
};

use crate::{AppState, auth::Auth, error::ApiError};

/// `GET /companies`
pub async fn list<S: PortalStore>(
  State(state): State<AppState<S>>,
  _auth: Auth,
) -> Result<Json<Vec<Company>>, ApiError> {
  let companies = state.store.list_companies().await.map_err(ApiError::store)?;
  Ok(Json(companies))
}

/// `POST /companies`: body: `{"name":"…","description":null,"is_parent":false}`
pub async fn create<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Json(body): Json<NewCompany>,
) -> Result<impl IntoResponse, ApiError> {
  auth.caller().require_superadmin()?;
  let company = state.store.add_company(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(company)))
}
