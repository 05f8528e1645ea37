//! Error types for `talenta-sheets`.

use talenta_core::id::CompanyId;
use thiserror::Error;

/// The upload is not a workbook calamine can open.
#[derive(Debug, Error)]
pub enum ReadError {
  #[error("workbook could not be parsed: {0}")]
  Parse(#[from] calamine::Error),
}

/// The first violation found by [`crate::validate`].
///
/// Row numbers are 1-based sheet rows, so the first data row under the
/// header and example rows is row 3.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("sheet {0:?} is missing or has no data rows")]
  MissingSheet(&'static str),

  #[error("column {field:?} not found in sheet {sheet:?}")]
  MissingField { sheet: &'static str, field: &'static str },

  #[error("{field} is empty at row {row} of sheet {sheet:?}")]
  EmptyRequiredField {
    sheet: &'static str,
    row:   usize,
    field: &'static str,
  },

  #[error("unreadable date at row {row} of sheet {sheet:?}")]
  InvalidDate { sheet: &'static str, row: usize },

  #[error(
    "invalid {field} at row {row} of sheet {sheet:?}; use one of: {}",
    .allowed.join(", ")
  )]
  InvalidEnum {
    sheet:   &'static str,
    row:     usize,
    field:   &'static str,
    allowed: Vec<String>,
  },
}

/// Failure of a whole import. Nothing is persisted unless the pipeline
/// returns `Ok`.
#[derive(Debug, Error)]
pub enum IngestError<E: std::error::Error + 'static> {
  #[error(transparent)]
  Read(#[from] ReadError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// A restricted caller uploaded a row for another company.
  #[error("row {row} targets company {company_id}, outside the caller's scope")]
  Forbidden { row: usize, company_id: CompanyId },

  #[error("persistence failed: {0}")]
  Persistence(#[source] E),
}
