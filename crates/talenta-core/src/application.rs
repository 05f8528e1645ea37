//! Applications (live candidacies) and their completed snapshots.
//!
//! An application lives in exactly one of two tables. Completing it moves
//! the row: a [`CompletedApplication`] is inserted and the live row deleted in
//! the same transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantNames};

use crate::{
  employee::{Employee, Level},
  id::{ApplicationId, CompanyId, CompletedApplicationId, EmployeeId, JobId},
};

/// Status written to every completed snapshot.
pub const COMPLETED_STATUS: &str = "Selesai";

/// Status of a live application. No transition graph is enforced: the update
/// action may set any value from any other value.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
  VariantNames,
)]
pub enum ApplicationStatus {
  #[default]
  #[serde(rename = "Dalam Review")]
  #[strum(serialize = "Dalam Review")]
  InReview,
  Interview,
  /// Rejected.
  Ditolak,
  Onboarding,
  /// Accepted.
  Diterima,
}

impl ApplicationStatus {
  pub fn as_str(self) -> &'static str { self.into() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  pub id:          ApplicationId,
  pub employee_id: EmployeeId,
  pub job_id:      JobId,
  pub status:      ApplicationStatus,
  pub applied_at:  DateTime<Utc>,
}

/// Input to [`crate::store::PortalStore::add_application`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
  pub employee_id: EmployeeId,
  pub job_id:      JobId,
  #[serde(default)]
  pub status:      ApplicationStatus,
  /// Defaults to the time the store receives the request.
  pub applied_at:  Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedApplication {
  pub id:           CompletedApplicationId,
  pub employee_id:  EmployeeId,
  pub job_id:       JobId,
  /// Always [`COMPLETED_STATUS`] for rows created by completion.
  pub status:       String,
  pub applied_at:   DateTime<Utc>,
  pub completed_at: DateTime<Utc>,
}

// ─── Joined read models ──────────────────────────────────────────────────────

/// Employee-side and job-side context joined onto an application row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidacy {
  pub employee_name:       String,
  pub employee_position:   String,
  pub employee_level:      Level,
  pub source_company_id:   CompanyId,
  pub source_company_name: String,
  pub job_title:           String,
  pub job_level:           String,
  pub job_family:          String,
  pub job_location:        String,
  pub target_company_id:   CompanyId,
  pub target_company_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDetail {
  #[serde(flatten)]
  pub application: Application,
  #[serde(flatten)]
  pub candidacy:   Candidacy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedApplicationDetail {
  #[serde(flatten)]
  pub completed: CompletedApplication,
  #[serde(flatten)]
  pub candidacy: Candidacy,
}

/// An employee in the talent-mobility pool with their live applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilityCandidate {
  #[serde(flatten)]
  pub employee:     Employee,
  pub company_name: String,
  pub applications: Vec<ApplicationDetail>,
}
