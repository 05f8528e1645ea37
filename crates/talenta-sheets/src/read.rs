//! Spreadsheet Reader: workbook bytes to named sheets of header-addressed
//! rows.
//!
//! In every sheet except [`INSTRUCTIONS_SHEET`] the first row holds the
//! headers and the second a human-readable example; data starts on the third.

use std::io::Cursor;

use calamine::{Data, Reader as _};

use crate::error::ReadError;

/// Free-text instructions shipped with the template; never parsed.
pub const INSTRUCTIONS_SHEET: &str = "Petunjuk";

/// One cell value, reduced to what validation distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Empty,
  Text(String),
  Number(f64),
  /// A native spreadsheet date, as its day serial.
  Date(f64),
  Bool(bool),
}

impl Cell {
  fn from_data(data: &Data) -> Self {
    match data {
      Data::Empty => Self::Empty,
      Data::String(s) => Self::Text(s.clone()),
      Data::Int(n) => Self::Number(*n as f64),
      Data::Float(f) => Self::Number(*f),
      Data::Bool(b) => Self::Bool(*b),
      Data::DateTime(dt) => Self::Date(dt.as_f64()),
      Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
      Data::Error(e) => Self::Text(e.to_string()),
    }
  }

  /// Trimmed textual form. Integral numbers render without a fraction so a
  /// numeric `ID Karyawan` of `1001` reads as `"1001"`.
  pub fn text(&self) -> String {
    match self {
      Self::Empty => String::new(),
      Self::Text(s) => s.trim().to_owned(),
      Self::Number(n) | Self::Date(n) => {
        if n.fract() == 0.0 && n.abs() < 1e15 {
          format!("{}", *n as i64)
        } else {
          n.to_string()
        }
      }
      Self::Bool(b) => b.to_string(),
    }
  }

  pub fn is_blank(&self) -> bool {
    match self {
      Self::Empty => true,
      Self::Text(s) => s.trim().is_empty(),
      _ => false,
    }
  }
}

/// A data row together with its 1-based position in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  pub number: usize,
  pub cells:  Vec<Cell>,
}

impl Row {
  /// The cell at `column`, or [`Cell::Empty`] past the end of a short row.
  pub fn cell(&self, column: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    self.cells.get(column).unwrap_or(&EMPTY)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
  pub name:    String,
  pub headers: Vec<String>,
  /// Data rows only; rows whose cells are all blank are dropped.
  pub rows:    Vec<Row>,
}

impl Sheet {
  /// Index of the column titled `header`.
  pub fn column(&self, header: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == header)
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
  pub sheets: Vec<Sheet>,
}

impl Workbook {
  pub fn sheet(&self, name: &str) -> Option<&Sheet> {
    self.sheets.iter().find(|s| s.name == name)
  }
}

/// Parse an `.xlsx`/`.xls`/`.ods` payload.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, ReadError> {
  let mut source = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

  let mut sheets = Vec::new();
  for name in source.sheet_names().to_vec() {
    if name == INSTRUCTIONS_SHEET {
      continue;
    }
    let range = source.worksheet_range(&name)?;
    // Ranges start at the first used cell, not necessarily A1.
    let first_row = range.start().map_or(0, |(row, _)| row as usize);

    let mut rows = range.rows();
    let headers = rows
      .next()
      .map(|header| header.iter().map(|d| Cell::from_data(d).text()).collect())
      .unwrap_or_default();

    let data = rows
      .enumerate()
      // The example row directly under the headers.
      .skip(1)
      .map(|(i, cells)| Row {
        number: first_row + i + 2,
        cells:  cells.iter().map(Cell::from_data).collect(),
      })
      .filter(|row| !row.cells.iter().all(Cell::is_blank))
      .collect();

    sheets.push(Sheet { name, headers, rows: data });
  }

  tracing::debug!(sheets = sheets.len(), "workbook read");
  Ok(Workbook { sheets })
}
