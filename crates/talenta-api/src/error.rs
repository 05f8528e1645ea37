//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use talenta_sheets::IngestError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error by the first [`talenta_core::Error`] in its
  /// source chain; anything else is an internal failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    match core_cause(&err) {
      Some(core) => Self::from_core(core),
      None => Self::Store(Box::new(err)),
    }
  }

  fn from_core(err: &talenta_core::Error) -> Self {
    use talenta_core::Error as E;
    let message = err.to_string();
    match err {
      e if e.is_not_found() => Self::NotFound(message),
      E::Forbidden(_) | E::SuperadminRequired => Self::Forbidden(message),
      E::JobInUse { .. } | E::DuplicateEmail(_) | E::DuplicateCompany(_) => {
        Self::Conflict(message)
      }
      _ => Self::Store(message.into()),
    }
  }
}

fn core_cause<'a>(
  err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a talenta_core::Error> {
  let mut current = Some(err);
  while let Some(e) = current {
    if let Some(core) = e.downcast_ref::<talenta_core::Error>() {
      return Some(core);
    }
    current = e.source();
  }
  None
}

impl From<talenta_core::Error> for ApiError {
  fn from(err: talenta_core::Error) -> Self { Self::from_core(&err) }
}

impl<E> From<IngestError<E>> for ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(err: IngestError<E>) -> Self {
    match err {
      IngestError::Read(e) => Self::BadRequest(e.to_string()),
      IngestError::Validation(e) => Self::BadRequest(e.to_string()),
      e @ IngestError::Forbidden { .. } => Self::Forbidden(e.to_string()),
      IngestError::Persistence(e) => Self::store(e),
    }
  }
}

impl From<talenta_sheets::XlsxError> for ApiError {
  fn from(err: talenta_sheets::XlsxError) -> Self { Self::Store(Box::new(err)) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let message = match &self {
      ApiError::Store(_) => "internal error".to_owned(),
      other => other.to_string(),
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"talenta\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use talenta_core::id::{CompanyId, EmployeeId, JobId};

  use super::*;

  #[derive(Debug, Error)]
  #[error("wrapped: {0}")]
  struct Wrapped(#[source] talenta_core::Error);

  #[test]
  fn core_errors_are_found_through_wrappers() {
    let err = ApiError::store(Wrapped(talenta_core::Error::EmployeeNotFound(EmployeeId(4))));
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = ApiError::store(Wrapped(talenta_core::Error::JobInUse {
      job_id:       JobId(1),
      applications: 2,
    }));
    assert!(matches!(err, ApiError::Conflict(_)));
  }

  #[test]
  fn status_codes() {
    let cases = [
      (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
      (talenta_core::Error::Forbidden(CompanyId(2)).into(), StatusCode::FORBIDDEN),
      (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
      (ApiError::store(std::io::Error::other("disk")), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(err.into_response().status(), status);
    }
  }
}
