//! Employees and the four child collections they own by composition.
//!
//! Child rows carry no identity of their own: a full update replaces each
//! collection wholesale instead of diffing individual entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantNames};

use crate::id::{CompanyId, EmployeeId};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Position grade relative to the board of directors.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
  VariantNames,
)]
pub enum Level {
  #[serde(rename = "BOD-1")]
  #[strum(serialize = "BOD-1")]
  Bod1,
  #[serde(rename = "BOD-2")]
  #[strum(serialize = "BOD-2")]
  Bod2,
  #[serde(rename = "BOD-3")]
  #[strum(serialize = "BOD-3")]
  Bod3,
  #[serde(rename = "BOD-4")]
  #[strum(serialize = "BOD-4")]
  Bod4,
  #[serde(rename = "BOD-5")]
  #[strum(serialize = "BOD-5")]
  Bod5,
}

impl Level {
  pub fn as_str(self) -> &'static str { self.into() }
}

/// Highest completed degree for one education entry.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
  VariantNames,
)]
pub enum EducationLevel {
  D3,
  S1,
  S2,
  S3,
}

impl EducationLevel {
  pub fn as_str(self) -> &'static str { self.into() }
}

/// Whether the employee is open to an internal transfer.
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
pub enum TalentMobility {
  Yes,
  #[default]
  No,
}

impl TalentMobility {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Employee ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:              EmployeeId,
  pub name:            String,
  pub email:           String,
  pub birth_date:      Option<NaiveDate>,
  pub position:        String,
  pub department:      String,
  pub company_id:      CompanyId,
  pub level:           Level,
  /// Job-family label ("rumpun jabatan").
  pub job_family:      String,
  pub talent_mobility: TalentMobility,
}

/// Employee-level fields without the surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
  pub name:            String,
  pub email:           String,
  pub birth_date:      Option<NaiveDate>,
  pub position:        String,
  pub department:      String,
  pub company_id:      CompanyId,
  pub level:           Level,
  pub job_family:      String,
  #[serde(default)]
  pub talent_mobility: TalentMobility,
}

impl NewEmployee {
  pub fn with_id(self, id: EmployeeId) -> Employee {
    Employee {
      id,
      name: self.name,
      email: self.email,
      birth_date: self.birth_date,
      position: self.position,
      department: self.department,
      company_id: self.company_id,
      level: self.level,
      job_family: self.job_family,
      talent_mobility: self.talent_mobility,
    }
  }
}

// ─── Child collections ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  pub institution:     String,
  pub level:           EducationLevel,
  pub major:           String,
  pub entry_year:      Option<i32>,
  pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
  /// Free text; not a reference to [`crate::company::Company`].
  pub company:     String,
  pub position:    String,
  pub start_date:  Option<NaiveDate>,
  pub end_date:    Option<NaiveDate>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
  pub name:        String,
  pub issuer:      String,
  pub issue_date:  Option<NaiveDate>,
  pub expiry_date: Option<NaiveDate>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationHistory {
  pub organization: String,
  pub position:     String,
  pub start_date:   Option<NaiveDate>,
  pub end_date:     Option<NaiveDate>,
  pub description:  Option<String>,
}

/// The four collections owned by one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCollections {
  #[serde(default)]
  pub education:            Vec<Education>,
  #[serde(default)]
  pub work_experience:      Vec<WorkExperience>,
  #[serde(default)]
  pub certifications:       Vec<Certification>,
  #[serde(default)]
  pub organization_history: Vec<OrganizationHistory>,
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// A complete employee as written by create, update and ingestion: core
/// fields plus every child collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
  #[serde(flatten)]
  pub employee: NewEmployee,
  #[serde(flatten)]
  pub children: ChildCollections,
}

/// Read model for a single employee page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
  #[serde(flatten)]
  pub employee:     Employee,
  pub company_name: String,
  #[serde(flatten)]
  pub children:     ChildCollections,
}

/// Row of an employee listing: core fields, company name and education.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSummary {
  #[serde(flatten)]
  pub employee:     Employee,
  pub company_name: String,
  pub education:    Vec<Education>,
}

/// One education row together with its owner, used by the database dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationListing {
  pub employee_id:   EmployeeId,
  pub employee_name: String,
  #[serde(flatten)]
  pub education:     Education,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn level_parses_exact_labels_only() {
    assert_eq!(Level::from_str("BOD-3").unwrap(), Level::Bod3);
    assert!(Level::from_str("BOD-6").is_err());
    assert!(Level::from_str("bod-1").is_err());
    assert_eq!(Level::VARIANTS, &["BOD-1", "BOD-2", "BOD-3", "BOD-4", "BOD-5"]);
  }

  #[test]
  fn as_str_matches_parse_label() {
    for label in Level::VARIANTS {
      assert_eq!(Level::from_str(label).unwrap().as_str(), *label);
    }
  }

  #[test]
  fn education_and_mobility_labels() {
    assert_eq!(EducationLevel::VARIANTS, &["D3", "S1", "S2", "S3"]);
    assert_eq!(TalentMobility::VARIANTS, &["Yes", "No"]);
    assert!(TalentMobility::from_str("yes").is_err());
  }
}
