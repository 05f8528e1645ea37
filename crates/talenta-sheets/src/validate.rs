//! Validator: reject a malformed upload before anything is persisted.
//!
//! Checks run in a fixed order and stop at the first violation: every
//! required sheet in [`schema::REQUIRED_SHEETS`] order (presence, then headers), then
//! employee rows, then education rows. The remaining sheets are converted
//! leniently: an unreadable optional date or year becomes `None`.

use std::{collections::HashMap, str::FromStr};

use chrono::NaiveDate;
use strum::VariantNames;
use talenta_core::{
  batch::BatchLocalId,
  employee::{
    Certification, Education, EducationLevel, Level, NewEmployee,
    OrganizationHistory, TalentMobility, WorkExperience,
  },
  id::CompanyId,
};

use crate::{
  batch::{Batch, Keyed},
  date::parse_cell_date,
  error::ValidationError,
  read::{Cell, Row, Sheet, Workbook},
  schema::{self, SheetSchema},
};

type Result<T, E = ValidationError> = std::result::Result<T, E>;

/// Validate `workbook` and type its rows.
///
/// `company_ids` is the set of companies currently in the store; an employee
/// row must reference one of them.
pub fn validate(workbook: &Workbook, company_ids: &[CompanyId]) -> Result<Batch> {
  let employees = Table::bind(workbook, schema::EMPLOYEES)?;
  let education = Table::bind(workbook, schema::EDUCATION)?;
  let work = Table::bind(workbook, schema::WORK_EXPERIENCE)?;
  let certifications = Table::bind(workbook, schema::CERTIFICATIONS)?;
  let organizations = Table::bind(workbook, schema::ORGANIZATION_HISTORY)?;

  let batch = Batch {
    employees:            employees.typed(|r| employee_row(r, company_ids))?,
    education:            education.typed(education_row)?,
    work_experience:      work.typed(|r| Ok(work_row(r)))?,
    certifications:       certifications.typed(|r| Ok(certification_row(r)))?,
    organization_history: organizations.typed(|r| Ok(organization_row(r)))?,
  };

  tracing::debug!(
    employees = batch.employees.len(),
    education = batch.education.len(),
    work_experience = batch.work_experience.len(),
    certifications = batch.certifications.len(),
    organization_history = batch.organization_history.len(),
    "batch validated"
  );
  Ok(batch)
}

// ─── Sheet binding ───────────────────────────────────────────────────────────

/// A required sheet whose headers have all been located.
struct Table<'a> {
  schema:  SheetSchema,
  sheet:   &'a Sheet,
  columns: HashMap<&'static str, usize>,
}

impl<'a> Table<'a> {
  fn bind(workbook: &'a Workbook, schema: SheetSchema) -> Result<Self> {
    let sheet = workbook
      .sheet(schema.name)
      .filter(|s| !s.rows.is_empty())
      .ok_or(ValidationError::MissingSheet(schema.name))?;

    let mut columns = HashMap::with_capacity(schema.columns.len());
    for header in schema.headers() {
      let index = sheet.column(header).ok_or(ValidationError::MissingField {
        sheet: schema.name,
        field: header,
      })?;
      columns.insert(header, index);
    }
    Ok(Self { schema, sheet, columns })
  }

  /// Run `convert` over every data row, keying each result by its row's
  /// "ID Karyawan".
  fn typed<T>(
    &self,
    convert: impl Fn(&Fields<'_>) -> Result<T>,
  ) -> Result<Vec<Keyed<T>>> {
    self
      .sheet
      .rows
      .iter()
      .map(|row| {
        let fields = Fields { table: self, row };
        let value = convert(&fields)?;
        Ok(Keyed {
          row: row.number,
          local_id: BatchLocalId::new(fields.text(schema::LOCAL_ID)),
          value,
        })
      })
      .collect()
  }
}

/// Header-addressed access to one row of a bound table.
struct Fields<'a> {
  table: &'a Table<'a>,
  row:   &'a Row,
}

impl Fields<'_> {
  fn sheet(&self) -> &'static str { self.table.schema.name }

  fn cell(&self, header: &'static str) -> &Cell {
    // Every schema header was located by `Table::bind`.
    let index = self.table.columns.get(header).copied().unwrap_or(usize::MAX);
    self.row.cell(index)
  }

  fn text(&self, header: &'static str) -> String { self.cell(header).text() }

  fn optional(&self, header: &'static str) -> Option<String> {
    Some(self.text(header)).filter(|s| !s.is_empty())
  }

  fn required(&self, header: &'static str) -> Result<String> {
    self.optional(header).ok_or(ValidationError::EmptyRequiredField {
      sheet: self.sheet(),
      row:   self.row.number,
      field: header,
    })
  }

  fn date(&self, header: &'static str) -> Option<NaiveDate> {
    parse_cell_date(self.cell(header))
  }

  fn year(&self, header: &'static str) -> Option<i32> {
    let text = self.text(header);
    text.parse::<i32>().ok().or_else(|| {
      text
        .parse::<f64>()
        .ok()
        .filter(|y| y.fract() == 0.0 && y.abs() < 1e6)
        .map(|y| y as i32)
    })
  }

  fn invalid_enum(&self, field: &'static str, allowed: &[&str]) -> ValidationError {
    ValidationError::InvalidEnum {
      sheet: self.sheet(),
      row: self.row.number,
      field,
      allowed: allowed.iter().map(|s| (*s).to_owned()).collect(),
    }
  }

  /// Parse an exact enum label; anything else lists the accepted labels.
  fn label<T: FromStr + VariantNames>(&self, header: &'static str) -> Result<T> {
    T::from_str(&self.text(header)).map_err(|_| self.invalid_enum(header, T::VARIANTS))
  }
}

// ─── Row conversions ─────────────────────────────────────────────────────────

fn employee_row(f: &Fields<'_>, company_ids: &[CompanyId]) -> Result<NewEmployee> {
  f.required(schema::LOCAL_ID)?;
  let email = f.required(schema::EMAIL)?;
  let birth_date = f.date(schema::BIRTH_DATE).ok_or(ValidationError::InvalidDate {
    sheet: f.sheet(),
    row:   f.row.number,
  })?;
  let talent_mobility: TalentMobility = f.label(schema::TALENT_MOBILITY)?;
  let level: Level = f.label(schema::LEVEL)?;
  let company_id = company_ref(f, company_ids)?;

  Ok(NewEmployee {
    name: f.text(schema::FULL_NAME),
    email,
    birth_date: Some(birth_date),
    position: f.text(schema::POSITION),
    department: f.text(schema::DEPARTMENT),
    company_id,
    level,
    job_family: f.text(schema::JOB_FAMILY),
    talent_mobility,
  })
}

/// "ID Perusahaan" must be an integer naming an existing company. Numeric
/// text such as `"3"` or `"3.0"` is accepted.
fn company_ref(f: &Fields<'_>, company_ids: &[CompanyId]) -> Result<CompanyId> {
  let parsed = match f.cell(schema::COMPANY_ID) {
    Cell::Number(n) => Some(*n),
    Cell::Text(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  parsed
    .filter(|n| n.fract() == 0.0)
    .map(|n| CompanyId(n as i64))
    .filter(|id| company_ids.contains(id))
    .ok_or_else(|| {
      let allowed: Vec<String> = company_ids.iter().map(|id| id.to_string()).collect();
      let allowed: Vec<&str> = allowed.iter().map(String::as_str).collect();
      f.invalid_enum(schema::COMPANY_ID, &allowed)
    })
}

fn education_row(f: &Fields<'_>) -> Result<Education> {
  let level: EducationLevel = f.label(schema::EDUCATION_LEVEL)?;
  Ok(Education {
    institution: f.text(schema::INSTITUTION),
    level,
    major: f.text(schema::MAJOR),
    entry_year: f.year(schema::ENTRY_YEAR),
    graduation_year: f.year(schema::GRADUATION_YEAR),
  })
}

fn work_row(f: &Fields<'_>) -> WorkExperience {
  WorkExperience {
    company:     f.text(schema::COMPANY_NAME),
    position:    f.text(schema::POSITION),
    start_date:  f.date(schema::START_DATE),
    end_date:    f.date(schema::END_DATE),
    description: f.optional(schema::DESCRIPTION),
  }
}

fn certification_row(f: &Fields<'_>) -> Certification {
  Certification {
    name:        f.text(schema::CERTIFICATION_NAME),
    issuer:      f.text(schema::ISSUER),
    issue_date:  f.date(schema::ISSUE_DATE),
    expiry_date: f.date(schema::EXPIRY_DATE),
    description: f.optional(schema::DESCRIPTION),
  }
}

fn organization_row(f: &Fields<'_>) -> OrganizationHistory {
  OrganizationHistory {
    organization: f.text(schema::ORGANIZATION),
    position:     f.text(schema::POSITION),
    start_date:   f.date(schema::START_DATE),
    end_date:     f.date(schema::END_DATE),
    description:  f.optional(schema::DESCRIPTION),
  }
}
