//! The date rule shared by validation and ingestion.
//!
//! A cell is a date when it is a native spreadsheet date, a number (taken as
//! a day serial) or text in one of [`TEXT_FORMATS`]. Serial `n` is
//! `1899-12-30 + n` days, which is the calendar day a spreadsheet shows for
//! every serial after February 1900 (the format counts a nonexistent
//! 1900-02-29).

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

use crate::read::Cell;

/// Text layouts tried in order.
pub const TEXT_FORMATS: &[&str] =
  &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y", "%d %b %Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Best-effort date of a cell; `None` when the cell is blank or unreadable.
pub fn parse_cell_date(cell: &Cell) -> Option<NaiveDate> {
  match cell {
    Cell::Number(n) | Cell::Date(n) => from_serial(*n),
    Cell::Text(s) => parse_text(s.trim()),
    Cell::Empty | Cell::Bool(_) => None,
  }
}

pub fn from_serial(serial: f64) -> Option<NaiveDate> {
  if !serial.is_finite() {
    return None;
  }
  let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
  let days = serial.trunc() as i64;
  if days >= 0 {
    epoch.checked_add_days(Days::new(days as u64))
  } else {
    epoch.checked_sub_days(Days::new(days.unsigned_abs()))
  }
}

fn parse_text(s: &str) -> Option<NaiveDate> {
  if s.is_empty() {
    return None;
  }
  TEXT_FORMATS
    .iter()
    .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    .or_else(|| {
      DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|dt| dt.date())
    })
    .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
