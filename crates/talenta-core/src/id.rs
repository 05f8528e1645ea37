//! Store-assigned integer surrogate keys.
//!
//! Each entity gets its own newtype so an employee key can never be passed
//! where a job key is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! surrogate_key {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<i64> for $name {
      fn from(v: i64) -> Self { Self(v) }
    }
  };
}

surrogate_key!(
  /// Primary key of a row in `companies`.
  CompanyId
);
surrogate_key!(
  /// Primary key of a row in `employees`.
  EmployeeId
);
surrogate_key!(JobId);
surrogate_key!(ApplicationId);
surrogate_key!(CompletedApplicationId);
surrogate_key!(UserId);
