//! JSON REST API for the Talenta HR portal.
//!
//! Exposes an axum [`Router`] backed by any
//! [`talenta_core::store::PortalStore`]. Every route except `POST /login`
//! requires HTTP Basic credentials (email and password) of a stored user;
//! the authenticated user's role and company decide what each handler may
//! read or change. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", talenta_api::api_router(state))
//! ```

pub mod applications;
pub mod auth;
pub mod companies;
pub mod completed;
pub mod employees;
pub mod error;
pub mod exports;
pub mod imports;
pub mod jobs;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post, put},
};
use talenta_core::store::PortalStore;

pub use auth::Auth;
pub use error::ApiError;

/// Upload cap applied to `POST /imports/employees` unless configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PortalStore> {
  pub store:            Arc<S>,
  /// Largest accepted workbook upload, in bytes.
  pub max_upload_bytes: usize,
}

impl<S: PortalStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: PortalStore + Clone + 'static,
{
  let upload_limit = state.max_upload_bytes;

  Router::new()
    // Session
    .route("/login", post(users::login::<S>))
    .route("/me", get(users::me::<S>))
    // Companies
    .route("/companies", get(companies::list::<S>).post(companies::create::<S>))
    // Employees
    .route("/employees", get(employees::list::<S>).post(employees::create::<S>))
    .route(
      "/employees/{id}",
      get(employees::get_one::<S>)
        .put(employees::update::<S>)
        .delete(employees::delete_one::<S>),
    )
    .route("/talent-mobility", get(employees::talent_mobility::<S>))
    // Jobs
    .route("/jobs", get(jobs::list::<S>).post(jobs::create::<S>))
    .route(
      "/jobs/{id}",
      get(jobs::get_one::<S>).put(jobs::update::<S>).delete(jobs::delete_one::<S>),
    )
    // Applications
    .route(
      "/applications",
      get(applications::list::<S>).post(applications::create::<S>),
    )
    .route("/applications/outgoing", get(applications::outgoing::<S>))
    .route(
      "/applications/{id}",
      get(applications::get_one::<S>).delete(applications::delete_one::<S>),
    )
    .route("/applications/{id}/status", put(applications::set_status::<S>))
    .route("/applications/{id}/complete", post(applications::complete::<S>))
    // Completed applications
    .route("/completed-applications", get(completed::list::<S>))
    .route(
      "/completed-applications/{id}",
      get(completed::get_one::<S>).delete(completed::delete_one::<S>),
    )
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/{id}/password", put(users::reset_password::<S>))
    // Spreadsheets
    .route(
      "/imports/employees",
      post(imports::upload::<S>).layer(DefaultBodyLimit::max(upload_limit)),
    )
    .route("/imports/template", get(imports::template::<S>))
    .route("/exports/candidates", get(exports::candidates::<S>))
    .route("/exports/completed", get(exports::completed::<S>))
    .route("/exports/database", get(exports::database::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
