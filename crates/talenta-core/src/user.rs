//! Portal users and the authenticated caller.

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::{
  id::{CompanyId, UserId},
  scope::Scope,
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  /// Unrestricted across every company of the group.
  Superadmin,
  /// HR staff of a single company.
  Hrd,
}

impl Role {
  pub fn as_str(self) -> &'static str { self.into() }
}

/// A user as exposed outside the store; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         UserId,
  pub name:       String,
  pub email:      String,
  pub role:       Role,
  /// Meaningful only for [`Role::Hrd`].
  pub company_id: Option<CompanyId>,
}

/// Input to [`crate::store::PortalStore::add_user`]. The password is already
/// hashed; hashing is the caller's concern.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
  pub company_id:    Option<CompanyId>,
}

/// A user together with the stored PHC hash, for login verification only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

/// The identity a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
  pub user_id:    Option<UserId>,
  pub role:       Role,
  pub company_id: Option<CompanyId>,
}

impl Caller {
  /// Unrestricted caller used by offline tooling (CLI import, seeding).
  pub fn system() -> Self {
    Self { user_id: None, role: Role::Superadmin, company_id: None }
  }

  pub fn scope(&self) -> Scope {
    Scope::from_parts(self.company_id, Some(self.role.as_str()))
  }

  pub fn is_superadmin(&self) -> bool { self.role == Role::Superadmin }

  pub fn require_superadmin(&self) -> crate::Result<()> {
    if self.is_superadmin() {
      Ok(())
    } else {
      Err(crate::Error::SuperadminRequired)
    }
  }
}

impl From<&User> for Caller {
  fn from(user: &User) -> Self {
    Self {
      user_id:    Some(user.id),
      role:       user.role,
      company_id: user.company_id,
    }
  }
}
