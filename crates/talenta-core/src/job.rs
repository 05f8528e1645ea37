//! Job postings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{CompanyId, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
  pub id:                 JobId,
  pub title:              String,
  pub department:         String,
  pub location:           String,
  pub description:        String,
  pub company_id:         CompanyId,
  pub posting_date:       NaiveDate,
  pub expiration_date:    NaiveDate,
  pub job_type:           String,
  pub qualification:      String,
  pub level:              String,
  pub job_family:         String,
  pub duration_months:    i32,
  pub placement_location: String,
}

/// Input to create and update actions; every field is replaced on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
  pub title:              String,
  pub department:         String,
  pub location:           String,
  pub description:        String,
  pub company_id:         CompanyId,
  pub posting_date:       NaiveDate,
  pub expiration_date:    NaiveDate,
  pub job_type:           String,
  pub qualification:      String,
  pub level:              String,
  pub job_family:         String,
  pub duration_months:    i32,
  pub placement_location: String,
}

impl NewJob {
  pub fn with_id(self, id: JobId) -> Job {
    Job {
      id,
      title: self.title,
      department: self.department,
      location: self.location,
      description: self.description,
      company_id: self.company_id,
      posting_date: self.posting_date,
      expiration_date: self.expiration_date,
      job_type: self.job_type,
      qualification: self.qualification,
      level: self.level,
      job_family: self.job_family,
      duration_months: self.duration_months,
      placement_location: self.placement_location,
    }
  }
}

/// A job together with the name of the company that posted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
  #[serde(flatten)]
  pub job:          Job,
  pub company_name: String,
}
