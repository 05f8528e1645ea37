//! A validated upload, typed but not yet joined.
//!
//! Child rows reference their employee through the sheet's own
//! "ID Karyawan" value; [`Batch::into_employees`] performs that join.

use std::collections::{HashMap, HashSet};

use talenta_core::{
  batch::{BatchEmployee, BatchLocalId},
  employee::{
    Certification, ChildCollections, Education, EmployeeRecord, NewEmployee,
    OrganizationHistory, WorkExperience,
  },
  id::CompanyId,
};

/// One typed sheet row with its sheet row number and local employee id.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
  pub row:      usize,
  pub local_id: BatchLocalId,
  pub value:    T,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
  pub employees:            Vec<Keyed<NewEmployee>>,
  pub education:            Vec<Keyed<Education>>,
  pub work_experience:      Vec<Keyed<WorkExperience>>,
  pub certifications:       Vec<Keyed<Certification>>,
  pub organization_history: Vec<Keyed<OrganizationHistory>>,
}

impl Batch {
  /// `(row, company)` for every employee row, in sheet order.
  pub fn company_refs(&self) -> impl Iterator<Item = (usize, CompanyId)> + '_ {
    self.employees.iter().map(|k| (k.row, k.value.company_id))
  }

  /// Join child rows onto their employees, preserving employee sheet order.
  ///
  /// An employee id listed twice receives the same children both times.
  /// Child rows whose id matches no employee row are dropped.
  pub fn into_employees(self) -> Vec<BatchEmployee> {
    let known: HashSet<BatchLocalId> =
      self.employees.iter().map(|k| k.local_id.clone()).collect();
    let mut children: HashMap<BatchLocalId, ChildCollections> = HashMap::new();

    fn attach<T>(
      rows: Vec<Keyed<T>>,
      sheet: &str,
      known: &HashSet<BatchLocalId>,
      children: &mut HashMap<BatchLocalId, ChildCollections>,
      pick: fn(&mut ChildCollections) -> &mut Vec<T>,
    ) {
      for k in rows {
        if !known.contains(&k.local_id) {
          tracing::warn!(
            sheet,
            row = k.row,
            local_id = %k.local_id,
            "child row references no employee; dropped"
          );
          continue;
        }
        pick(children.entry(k.local_id).or_default()).push(k.value);
      }
    }

    attach(self.education, "education", &known, &mut children, |c| &mut c.education);
    attach(
      self.work_experience,
      "work_experience",
      &known,
      &mut children,
      |c| &mut c.work_experience,
    );
    attach(
      self.certifications,
      "certifications",
      &known,
      &mut children,
      |c| &mut c.certifications,
    );
    attach(
      self.organization_history,
      "organization_history",
      &known,
      &mut children,
      |c| &mut c.organization_history,
    );

    self
      .employees
      .into_iter()
      .map(|k| {
        let children = children.get(&k.local_id).cloned().unwrap_or_default();
        BatchEmployee {
          local_id: k.local_id,
          record:   EmployeeRecord { employee: k.value, children },
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use talenta_core::employee::{EducationLevel, Level, TalentMobility};

  use super::*;

  fn employee(row: usize, local: &str, name: &str) -> Keyed<NewEmployee> {
    Keyed {
      row,
      local_id: BatchLocalId::new(local),
      value: NewEmployee {
        name:            name.into(),
        email:           format!("{name}@example.com"),
        birth_date:      None,
        position:        "Staff".into(),
        department:      "IT".into(),
        company_id:      CompanyId(1),
        level:           Level::Bod4,
        job_family:      "Technical".into(),
        talent_mobility: TalentMobility::No,
      },
    }
  }

  fn education(row: usize, local: &str, institution: &str) -> Keyed<Education> {
    Keyed {
      row,
      local_id: BatchLocalId::new(local),
      value: Education {
        institution:     institution.into(),
        level:           EducationLevel::S1,
        major:           "Akuntansi".into(),
        entry_year:      Some(2010),
        graduation_year: Some(2014),
      },
    }
  }

  #[test]
  fn children_join_by_local_id() {
    let batch = Batch {
      employees: vec![employee(3, "K001", "ani"), employee(4, "K002", "budi")],
      education: vec![
        education(3, "K002", "UGM"),
        education(4, "K001", "UI"),
        education(5, "K001", "ITB"),
      ],
      ..Batch::default()
    };

    let joined = batch.into_employees();
    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].local_id.as_str(), "K001");
    let ani: Vec<_> =
      joined[0].record.children.education.iter().map(|e| e.institution.as_str()).collect();
    assert_eq!(ani, ["UI", "ITB"]);
    assert_eq!(joined[1].record.children.education.len(), 1);
  }

  #[test]
  fn orphans_are_dropped_and_duplicates_share_children() {
    let batch = Batch {
      employees: vec![employee(3, "K001", "ani"), employee(4, "K001", "ani")],
      education: vec![education(3, "K001", "UI"), education(4, "K999", "UGM")],
      ..Batch::default()
    };

    let joined = batch.into_employees();
    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].record.children, joined[1].record.children);
    assert_eq!(joined[0].record.children.education.len(), 1);
  }
}
