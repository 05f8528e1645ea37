//! Role scoping: which companies' rows a caller may see or touch.
//!
//! Every listing and single-row read goes through one [`Scope`] so the same
//! predicate applies no matter which entry point produced the result.

use crate::{Error, Result, id::CompanyId};

/// Role string that lifts every company restriction.
pub const UNRESTRICTED_ROLE: &str = "superadmin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  /// Every company.
  All,
  /// Only rows whose company reference equals this id.
  Company(CompanyId),
  /// No rows at all: a restricted caller with no company affiliation.
  Nothing,
}

impl Scope {
  /// Build a scope from the `(companyId, role)` pair every entry point
  /// accepts.
  ///
  /// The unrestricted role sees everything; otherwise a company id narrows
  /// the result to that company, and its absence yields an empty result.
  pub fn from_parts(company_id: Option<CompanyId>, role: Option<&str>) -> Self {
    match (role, company_id) {
      (Some(UNRESTRICTED_ROLE), _) => Self::All,
      (_, Some(id)) => Self::Company(id),
      (_, None) => Self::Nothing,
    }
  }

  pub fn admits(&self, company_id: CompanyId) -> bool {
    match self {
      Self::All => true,
      Self::Company(id) => *id == company_id,
      Self::Nothing => false,
    }
  }

  /// Reject with [`Error::Forbidden`] unless the scope admits `company_id`.
  pub fn ensure(&self, company_id: CompanyId) -> Result<()> {
    if self.admits(company_id) {
      Ok(())
    } else {
      Err(Error::Forbidden(company_id))
    }
  }

  /// The SQL-level view of the scope: `None` means "return nothing",
  /// `Some(None)` means "no filter", `Some(Some(id))` filters by company.
  pub fn company_filter(&self) -> Option<Option<CompanyId>> {
    match self {
      Self::All => Some(None),
      Self::Company(id) => Some(Some(*id)),
      Self::Nothing => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn superadmin_ignores_company() {
    let s = Scope::from_parts(Some(CompanyId(3)), Some("superadmin"));
    assert_eq!(s, Scope::All);
    assert!(s.admits(CompanyId(9)));
  }

  #[test]
  fn hrd_is_restricted_to_own_company() {
    let s = Scope::from_parts(Some(CompanyId(2)), Some("hrd"));
    assert!(s.admits(CompanyId(2)));
    assert!(!s.admits(CompanyId(5)));
    assert!(matches!(s.ensure(CompanyId(5)), Err(Error::Forbidden(CompanyId(5)))));
  }

  #[test]
  fn missing_company_sees_nothing() {
    let s = Scope::from_parts(None, Some("hrd"));
    assert_eq!(s, Scope::Nothing);
    assert_eq!(s.company_filter(), None);
    assert_eq!(Scope::from_parts(None, None), Scope::Nothing);
  }

  #[test]
  fn unknown_role_with_company_is_restricted() {
    let s = Scope::from_parts(Some(CompanyId(4)), Some("guest"));
    assert_eq!(s.company_filter(), Some(Some(CompanyId(4))));
  }
}
