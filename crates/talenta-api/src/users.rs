//! Session and user-administration handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/login` | Body: `{"email":"…","password":"…"}`; no auth header |
//! | `GET`  | `/me` | The authenticated user |
//! | `GET`  | `/users` | Superadmin only |
//! | `POST` | `/users` | Superadmin only; body: [`CreateUserBody`] |
//! | `PUT`  | `/users/{id}/password` | Superadmin only; body: `{"password":"…"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use talenta_core::{
  id::{CompanyId, UserId},
  store::PortalStore,
  user::{NewUser, Role, User},
};

use crate::{
  AppState,
  auth::{Auth, hash_password, verify_credentials},
  error::ApiError,
};

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /login`
///
/// The login audit row is best-effort: failing to write it is logged and
/// does not fail the login.
pub async fn login<S: PortalStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<User>, ApiError> {
  let user = verify_credentials(state.store.as_ref(), &body.email, &body.password).await?;

  if let Err(e) = state.store.record_login(user.id).await {
    tracing::warn!(user_id = %user.id, error = %e, "failed to record login event");
  }
  tracing::info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
  Ok(Json(user))
}

/// `GET /me`
pub async fn me<S: PortalStore>(
  State(_state): State<AppState<S>>,
  auth: Auth,
) -> Json<User> {
  Json(auth.user)
}

// ─── Administration ──────────────────────────────────────────────────────────

/// `GET /users`: never includes password hashes.
pub async fn list<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
) -> Result<Json<Vec<User>>, ApiError> {
  auth.caller().require_superadmin()?;
  let users = state.store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
  pub name:       String,
  pub email:      String,
  pub password:   String,
  pub role:       Role,
  /// Required for `hrd`.
  pub company_id: Option<CompanyId>,
}

/// `POST /users`
pub async fn create<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, ApiError> {
  auth.caller().require_superadmin()?;
  if body.role == Role::Hrd && body.company_id.is_none() {
    return Err(ApiError::BadRequest("hrd users need a company_id".into()));
  }
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }

  let user = state
    .store
    .add_user(NewUser {
      name:          body.name,
      email:         body.email,
      password_hash: hash_password(&body.password)?,
      role:          body.role,
      company_id:    body.company_id,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct PasswordBody {
  pub password: String,
}

/// `PUT /users/{id}/password`
pub async fn reset_password<S: PortalStore>(
  State(state): State<AppState<S>>,
  auth: Auth,
  Path(id): Path<UserId>,
  Json(body): Json<PasswordBody>,
) -> Result<StatusCode, ApiError> {
  auth.caller().require_superadmin()?;
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }
  state
    .store
    .set_password_hash(id, hash_password(&body.password)?)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(user_id = %id, "password reset");
  Ok(StatusCode::NO_CONTENT)
}
