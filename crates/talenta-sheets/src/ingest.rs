//! The ingestion pipeline: bytes to committed employees.
//!
//! Every check (parse, validation, caller scope) completes before the store
//! is asked to write anything, and the write itself is one transaction.

use talenta_core::{
  batch::UpsertReport,
  id::CompanyId,
  store::PortalStore,
  user::Caller,
};

use crate::{
  error::IngestError,
  read::{Workbook, read_workbook},
  validate::validate,
};

/// Read, validate and persist an uploaded workbook on behalf of `caller`.
pub async fn import_workbook<S: PortalStore>(
  store: &S,
  caller: &Caller,
  bytes: &[u8],
) -> Result<UpsertReport, IngestError<S::Error>> {
  let workbook = read_workbook(bytes)?;
  import_sheets(store, caller, &workbook).await
}

/// Validate and persist an already-read workbook.
pub async fn import_sheets<S: PortalStore>(
  store: &S,
  caller: &Caller,
  workbook: &Workbook,
) -> Result<UpsertReport, IngestError<S::Error>> {
  let company_ids: Vec<CompanyId> = store
    .list_companies()
    .await
    .map_err(IngestError::Persistence)?
    .into_iter()
    .map(|c| c.id)
    .collect();

  let batch = validate(workbook, &company_ids)?;

  let scope = caller.scope();
  if let Some((row, company_id)) = batch.company_refs().find(|(_, c)| !scope.admits(*c)) {
    tracing::warn!(
      user_id = ?caller.user_id,
      row,
      company_id = %company_id,
      "ingest rejected: row outside caller scope"
    );
    return Err(IngestError::Forbidden { row, company_id });
  }

  let employees = batch.into_employees();
  let report = store
    .upsert_employees(employees)
    .await
    .map_err(IngestError::Persistence)?;

  tracing::info!(
    user_id = ?caller.user_id,
    intended = report.intended,
    created = report.created,
    updated = report.updated,
    "workbook ingested"
  );
  Ok(report)
}
