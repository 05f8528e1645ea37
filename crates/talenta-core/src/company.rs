//! Companies of the group. Every employee and job belongs to exactly one.

use serde::{Deserialize, Serialize};

use crate::id::CompanyId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub id:          CompanyId,
  /// Unique across the group.
  pub name:        String,
  pub description: Option<String>,
  /// The holding company of the group.
  pub is_parent:   bool,
}

/// Input to [`crate::store::PortalStore::add_company`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
  pub name:        String,
  pub description: Option<String>,
  #[serde(default)]
  pub is_parent:   bool,
}
