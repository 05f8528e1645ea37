//! Spreadsheet codec for the Talenta portal.
//!
//! Reads the five-sheet employee workbook, validates it, assembles a typed
//! batch joined on each row's `ID Karyawan`, and hands the batch to a
//! [`talenta_core::store::PortalStore`] for the transactional upsert. Also
//! writes the blank upload template and the report exports.
//!
//! ```text
//! bytes ─▶ read ─▶ Workbook ─▶ validate ─▶ Batch ─▶ upsert_employees
//! ```

pub mod batch;
pub mod date;
pub mod error;
pub mod export;
pub mod ingest;
pub mod read;
pub mod schema;
pub mod template;
pub mod validate;

pub use batch::Batch;
pub use error::{IngestError, ReadError, ValidationError};
pub use ingest::{import_sheets, import_workbook};
pub use read::{Cell, Sheet, Workbook, read_workbook};
pub use rust_xlsxwriter::XlsxError;
pub use validate::validate;

/// MIME type of every workbook this crate writes.
pub const XLSX_CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[cfg(test)]
mod tests;
