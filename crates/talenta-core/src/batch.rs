//! Types shared by the bulk ingestion pipeline and the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{employee::EmployeeRecord, id::EmployeeId};

/// The spreadsheet's own "ID Karyawan" value.
///
/// It joins rows across sheets within a single upload and is never stored,
/// so it is a distinct type from [`EmployeeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchLocalId(String);

impl BatchLocalId {
  pub fn new(raw: impl Into<String>) -> Self { Self(raw.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BatchLocalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// One employee of a batch with the child rows joined to it.
#[derive(Debug, Clone)]
pub struct BatchEmployee {
  pub local_id: BatchLocalId,
  pub record:   EmployeeRecord,
}

/// Create-or-update decision for one batch row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
  Create,
  /// An employee matched by name or email; its key is preserved.
  Update(EmployeeId),
}

/// Outcome of a committed batch. A failed batch reports nothing: it is
/// rolled back as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReport {
  /// Number of employee rows in the batch.
  pub intended: usize,
  pub created:  usize,
  pub updated:  usize,
}
