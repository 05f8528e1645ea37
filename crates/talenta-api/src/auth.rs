//! HTTP Basic-auth extractor, credential verification and password hashing.
//!
//! The Basic user name is the account email. Passwords are checked against
//! the argon2 PHC string stored with the user.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;
use talenta_core::{
  store::PortalStore,
  user::{Caller, User},
};

use crate::{AppState, error::ApiError};

/// The authenticated user behind a request.
#[derive(Debug, Clone)]
pub struct Auth {
  pub user: User,
}

impl Auth {
  pub fn caller(&self) -> Caller { Caller::from(&self.user) }
}

/// Split an `Authorization: Basic …` header into email and password.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((email.to_owned(), password.to_owned()))
}

/// Look up `email` and check `password` against its stored hash.
///
/// Unknown emails and wrong passwords are indistinguishable to the caller.
pub async fn verify_credentials<S: PortalStore>(
  store: &S,
  email: &str,
  password: &str,
) -> Result<User, ApiError> {
  let creds = store
    .find_user_by_email(email.to_owned())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&creds.password_hash).map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(creds.user)
}

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))
}

impl<S> FromRequestParts<AppState<S>> for Auth
where
  S: PortalStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let (email, password) = basic_credentials(&parts.headers)?;
    let user = verify_credentials(state.store.as_ref(), &email, &password).await?;
    Ok(Auth { user })
  }
}

#[cfg(test)]
mod tests {
  use axum::http::{HeaderValue, header};

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn splits_email_and_password() {
    let value = format!("Basic {}", B64.encode("hr@example.com:s3cr:et"));
    let (email, password) = basic_credentials(&headers(&value)).unwrap();
    assert_eq!(email, "hr@example.com");
    assert_eq!(password, "s3cr:et");
  }

  #[test]
  fn rejects_malformed_headers() {
    assert!(matches!(basic_credentials(&HeaderMap::new()), Err(ApiError::Unauthorized)));
    assert!(matches!(basic_credentials(&headers("Bearer abc")), Err(ApiError::Unauthorized)));
    assert!(matches!(
      basic_credentials(&headers("Basic !!!not-base64!!!")),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn hashes_verify() {
    let hash = hash_password("rahasia").unwrap();
    let parsed = PasswordHash::new(&hash).unwrap();
    assert!(Argon2::default().verify_password(b"rahasia", &parsed).is_ok());
    assert!(Argon2::default().verify_password(b"salah", &parsed).is_err());
  }
}
