//! Error types for `talenta-core`.

use thiserror::Error;

use crate::id::{
  ApplicationId, CompanyId, CompletedApplicationId, EmployeeId, JobId, UserId,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("company not found: {0}")]
  CompanyNotFound(CompanyId),

  #[error("employee not found: {0}")]
  EmployeeNotFound(EmployeeId),

  #[error("job not found: {0}")]
  JobNotFound(JobId),

  #[error("application not found: {0}")]
  ApplicationNotFound(ApplicationId),

  #[error("completed application not found: {0}")]
  CompletedApplicationNotFound(CompletedApplicationId),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  /// The caller's scope does not admit the company the action targets.
  #[error("not permitted to act on company {0}")]
  Forbidden(CompanyId),

  /// The action is reserved for the unrestricted role.
  #[error("superadmin role required")]
  SuperadminRequired,

  #[error("job {job_id} still has {applications} application(s)")]
  JobInUse { job_id: JobId, applications: usize },

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("company name already registered: {0}")]
  DuplicateCompany(String),

  #[error("unknown {kind} value: {value:?}")]
  UnknownValue { kind: &'static str, value: String },
}

impl Error {
  /// True for the variants that mean "the referenced row does not exist".
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::CompanyNotFound(_)
        | Self::EmployeeNotFound(_)
        | Self::JobNotFound(_)
        | Self::ApplicationNotFound(_)
        | Self::CompletedApplicationNotFound(_)
        | Self::UserNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
